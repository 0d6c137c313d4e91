//! Journal repository: entry posting and retrieval.
//!
//! Entries are immutable once posted. Posting validates the line set with
//! `tally-core`, allocates the next company-scoped entry number, and inserts
//! the header plus lines atomically inside one serializable transaction.
//! A concurrent poster that races for the same number trips the unique
//! constraint; the loser retries with a fresh number.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IsolationLevel, Order,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use tally_core::journal::{
    next_entry_number, validate_entry, AccountRef, JournalError, PostEntryInput,
};
use tally_shared::types::AccountId;

use crate::entities::{accounts, journal_entries, journal_lines};

/// Attempts before giving up on an entry-number race.
const MAX_POST_ATTEMPTS: u32 = 5;

/// Error types for journal posting and retrieval.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// Entry failed domain validation; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] JournalError),

    /// Entry-number allocation kept colliding with concurrent posters.
    #[error("Could not allocate an entry number after {0} attempts")]
    NumberAllocationExhausted(u32),

    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A journal entry together with its lines in order.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// The entry header.
    pub entry: journal_entries::Model,
    /// Lines ordered by `line_order`.
    pub lines: Vec<journal_lines::Model>,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and posts a journal entry atomically.
    ///
    /// The whole operation runs inside a serializable transaction: account
    /// lookup, validation, entry-number allocation, and the header + line
    /// inserts. The entry is posted at insert; there is no draft state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the line set fails validation (fewer than two lines, ambiguous or
    ///   negative amounts, unknown or inactive accounts, unbalanced totals)
    /// - the entry number kept colliding after [`MAX_POST_ATTEMPTS`] tries
    /// - the database fails
    pub async fn post_entry(
        &self,
        input: PostEntryInput,
    ) -> Result<EntryWithLines, PostingError> {
        let mut attempt = 1;
        loop {
            match self.try_post_entry(&input).await {
                Ok(posted) => {
                    tracing::info!(
                        entry_number = %posted.entry.entry_number,
                        company_id = %posted.entry.company_id,
                        total = %posted.entry.total_debit,
                        "journal entry posted"
                    );
                    return Ok(posted);
                }
                Err(PostingError::Database(err)) if is_retryable(&err) => {
                    if attempt >= MAX_POST_ATTEMPTS {
                        return Err(PostingError::NumberAllocationExhausted(attempt));
                    }
                    tracing::warn!(%attempt, error = %err, "entry number race, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_post_entry(&self, input: &PostEntryInput) -> Result<EntryWithLines, PostingError> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        // Resolve the referenced accounts within the company.
        let account_ids: Vec<Uuid> = input
            .lines
            .iter()
            .map(|l| l.account_id.into_inner())
            .collect();
        let rows = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(input.company_id.into_inner()))
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(&txn)
            .await?;
        let by_id: HashMap<Uuid, &accounts::Model> =
            rows.iter().map(|a| (a.id, a)).collect();

        let totals = validate_entry(&input.lines, |id: AccountId| {
            by_id.get(&id.into_inner()).map(|a| AccountRef {
                id,
                is_active: a.is_active,
            })
        })?;

        // Highest existing number for the company. The padding keeps lexical
        // and numeric order aligned only up to JE-99999; past that the number
        // grows a digit, so longer strings sort first.
        let number_length = SimpleExpr::from(Func::char_length(Expr::col(
            journal_entries::Column::EntryNumber,
        )));
        let latest = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(input.company_id.into_inner()))
            .order_by(number_length, Order::Desc)
            .order_by_desc(journal_entries::Column::EntryNumber)
            .one(&txn)
            .await?;
        let entry_number = next_entry_number(latest.as_ref().map(|e| e.entry_number.as_str()))?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let entry_id = Uuid::new_v4();
        let entry = journal_entries::ActiveModel {
            id: Set(entry_id),
            company_id: Set(input.company_id.into_inner()),
            entry_number: Set(entry_number),
            entry_date: Set(input.entry_date),
            description: Set(input.description.clone()),
            reference_type: Set(input.reference_type.into()),
            reference_id: Set(input.reference_id),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            is_posted: Set(true),
            created_by: Set(input.created_by.into_inner()),
            created_at: Set(now),
        };
        let entry = entry.insert(&txn).await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for (order, line) in input.lines.iter().enumerate() {
            let row = journal_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                entry_id: Set(entry_id),
                account_id: Set(line.account_id.into_inner()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                description: Set(line.description.clone()),
                line_order: Set(i32::try_from(order).unwrap_or(i32::MAX)),
                created_at: Set(now),
            };
            lines.push(row.insert(&txn).await?);
        }

        txn.commit().await?;
        Ok(EntryWithLines { entry, lines })
    }

    /// Fetches an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or the query fails.
    pub async fn get_entry(&self, entry_id: Uuid) -> Result<EntryWithLines, PostingError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await?
            .ok_or(PostingError::EntryNotFound(entry_id))?;

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(entry_id))
            .order_by_asc(journal_lines::Column::LineOrder)
            .all(&self.db)
            .await?;

        Ok(EntryWithLines { entry, lines })
    }

    /// Lists a company's entries within a date window, ordered by entry
    /// date then entry number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries(
        &self,
        company_id: Uuid,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<journal_entries::Model>, PostingError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id))
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::EntryNumber);

        if let Some(from) = from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        let entries = query.all(&self.db).await?;
        Ok(entries)
    }
}

/// A unique violation on `(company_id, entry_number)` or a serialization
/// failure means another poster won the number; both are safe to retry.
fn is_retryable(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    err.to_string().contains("could not serialize access")
}
