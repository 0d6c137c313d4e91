//! Closing repository: period closing and opening-balance snapshots.
//!
//! Closing never touches journal history. The repository computes raw
//! account nets as of the period end, hands them to `tally-core::closing`
//! for validation and the debit/credit split, and runs the duplicate check,
//! the nets query, and the inserts inside one serializable transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IsolationLevel, JoinType, QueryFilter, QuerySelect, RelationTrait, Set,
    SqlErr, TransactionTrait,
};
use uuid::Uuid;

use tally_core::closing::{
    compute_opening_balances, validate_period, validate_transition, AccountNet, ClosingStatus,
    ClosingValidationError,
};
use tally_shared::types::AccountId;

use crate::entities::{
    accounts, journal_entries, journal_lines, opening_balances, period_closings,
    sea_orm_active_enums,
};

/// Attempts before giving up on a serialization conflict during closing.
const MAX_CLOSE_ATTEMPTS: u32 = 5;

/// Error types for period-closing operations.
#[derive(Debug, thiserror::Error)]
pub enum ClosingError {
    /// A closing already exists for this company and period end.
    #[error("Period ending {period_end} is already closed for this company")]
    PeriodAlreadyClosed {
        /// The contested period end.
        period_end: NaiveDate,
    },

    /// Closing row not found.
    #[error("Period closing not found: {0}")]
    ClosingNotFound(Uuid),

    /// The snapshot computation rejected the period.
    #[error(transparent)]
    Validation(#[from] ClosingValidationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for closing a period.
#[derive(Debug, Clone)]
pub struct ClosePeriodInput {
    /// Company whose period is being closed.
    pub company_id: Uuid,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User performing the closing.
    pub closed_by: Uuid,
}

/// A persisted closing with its snapshot rows.
#[derive(Debug, Clone)]
pub struct ClosingWithSnapshot {
    /// The closing row.
    pub closing: period_closings::Model,
    /// Opening-balance rows dated the day after the period.
    pub opening_balances: Vec<opening_balances::Model>,
}

#[derive(Debug, FromQueryResult)]
struct AccountNetRow {
    account_id: Uuid,
    total_debit: Option<Decimal>,
    total_credit: Option<Decimal>,
}

/// Closing repository.
#[derive(Debug, Clone)]
pub struct ClosingRepository {
    db: DatabaseConnection,
}

impl ClosingRepository {
    /// Creates a new closing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Closes a period, snapshotting opening balances for the next one.
    ///
    /// The duplicate check, the nets query, and the inserts all run inside
    /// one serializable transaction, so a journal entry committed while the
    /// closing is in flight either lands in the snapshot or aborts it. A
    /// serialization conflict is retried with fresh state; journal history
    /// is never modified and revenue/expense accounts are not zeroed out.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the period is malformed or the books do not balance
    /// - a closing already exists for `(company, period_end)`
    /// - the database fails
    pub async fn close_period(
        &self,
        input: ClosePeriodInput,
    ) -> Result<ClosingWithSnapshot, ClosingError> {
        validate_period(input.period_start, input.period_end)?;

        let mut attempt = 1;
        loop {
            match self.try_close_period(&input).await {
                Ok(result) => {
                    tracing::info!(
                        closing_id = %result.closing.id,
                        company_id = %result.closing.company_id,
                        period_end = %result.closing.period_end,
                        accounts = result.opening_balances.len(),
                        "period closed"
                    );
                    return Ok(result);
                }
                // The loser of a concurrent close trips the unique key on
                // (company_id, period_end): the period is closed, just not
                // by this caller.
                Err(ClosingError::Database(err))
                    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
                {
                    return Err(ClosingError::PeriodAlreadyClosed {
                        period_end: input.period_end,
                    });
                }
                Err(ClosingError::Database(err)) if is_serialization_failure(&err) => {
                    if attempt >= MAX_CLOSE_ATTEMPTS {
                        return Err(ClosingError::Database(err));
                    }
                    tracing::warn!(%attempt, error = %err, "closing serialization conflict, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_close_period(
        &self,
        input: &ClosePeriodInput,
    ) -> Result<ClosingWithSnapshot, ClosingError> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        // Any closing row blocks the period end, reopened or not: rows are
        // append-only and the (company_id, period_end) key admits one.
        let existing = period_closings::Entity::find()
            .filter(period_closings::Column::CompanyId.eq(input.company_id))
            .filter(period_closings::Column::PeriodEnd.eq(input.period_end))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ClosingError::PeriodAlreadyClosed {
                period_end: input.period_end,
            });
        }

        let nets = Self::account_nets(&txn, input.company_id, input.period_end).await?;
        let snapshot = compute_opening_balances(&nets, input.period_end)?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();

        let closing = period_closings::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(input.company_id),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            status: Set(sea_orm_active_enums::ClosingStatus::Closed),
            notes: Set(input.notes.clone()),
            closed_by: Set(input.closed_by),
            closed_at: Set(now),
            created_at: Set(now),
        };
        let closing = closing.insert(&txn).await?;

        let mut rows = Vec::with_capacity(snapshot.len());
        for row in snapshot {
            let model = opening_balances::ActiveModel {
                id: Set(Uuid::new_v4()),
                closing_id: Set(closing.id),
                account_id: Set(row.account_id.into_inner()),
                balance_date: Set(row.balance_date),
                debit_balance: Set(row.debit_balance),
                credit_balance: Set(row.credit_balance),
                created_at: Set(now),
            };
            rows.push(model.insert(&txn).await?);
        }

        txn.commit().await?;
        Ok(ClosingWithSnapshot {
            closing,
            opening_balances: rows,
        })
    }

    /// Reopens a closed period. The closing row and its snapshot stay for
    /// audit; only the status flips.
    ///
    /// # Errors
    ///
    /// Returns an error if the closing does not exist, the transition is
    /// invalid, or the update fails.
    pub async fn reopen_period(
        &self,
        closing_id: Uuid,
    ) -> Result<period_closings::Model, ClosingError> {
        let closing = period_closings::Entity::find_by_id(closing_id)
            .one(&self.db)
            .await?
            .ok_or(ClosingError::ClosingNotFound(closing_id))?;

        validate_transition(closing.status.into(), ClosingStatus::Reopened)?;

        let mut active: period_closings::ActiveModel = closing.into();
        active.status = Set(sea_orm_active_enums::ClosingStatus::Reopened);
        let updated = active.update(&self.db).await?;

        tracing::info!(closing_id = %updated.id, "period reopened");
        Ok(updated)
    }

    /// Finds a closing by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(
        &self,
        closing_id: Uuid,
    ) -> Result<Option<period_closings::Model>, ClosingError> {
        let closing = period_closings::Entity::find_by_id(closing_id)
            .one(&self.db)
            .await?;
        Ok(closing)
    }

    /// Reads back an account's opening balance for a date, if snapshotted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn opening_balance(
        &self,
        account_id: Uuid,
        balance_date: NaiveDate,
    ) -> Result<Option<opening_balances::Model>, ClosingError> {
        let row = opening_balances::Entity::find()
            .filter(opening_balances::Column::AccountId.eq(account_id))
            .filter(opening_balances::Column::BalanceDate.eq(balance_date))
            .one(&self.db)
            .await?;
        Ok(row)
    }

    /// Raw per-account nets (`debit - credit`) over posted lines with
    /// `entry_date <= as_of`, for all active accounts of the company.
    async fn account_nets<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountNet>, ClosingError> {
        let rows: Vec<AccountNetRow> = journal_lines::Entity::find()
            .join(
                JoinType::InnerJoin,
                journal_lines::Relation::JournalEntries.def(),
            )
            .join(JoinType::InnerJoin, journal_lines::Relation::Accounts.def())
            .filter(journal_entries::Column::CompanyId.eq(company_id))
            .filter(journal_entries::Column::IsPosted.eq(true))
            .filter(journal_entries::Column::EntryDate.lte(as_of))
            .filter(accounts::Column::IsActive.eq(true))
            .select_only()
            .column(journal_lines::Column::AccountId)
            .column_as(journal_lines::Column::Debit.sum(), "total_debit")
            .column_as(journal_lines::Column::Credit.sum(), "total_credit")
            .group_by(journal_lines::Column::AccountId)
            .into_model::<AccountNetRow>()
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| AccountNet {
                account_id: AccountId::from_uuid(r.account_id),
                net: r.total_debit.unwrap_or(Decimal::ZERO)
                    - r.total_credit.unwrap_or(Decimal::ZERO),
            })
            .collect())
    }
}

/// A serializable transaction that lost to a concurrent writer is safe to
/// retry from scratch.
fn is_serialization_failure(err: &DbErr) -> bool {
    err.to_string().contains("could not serialize access")
}
