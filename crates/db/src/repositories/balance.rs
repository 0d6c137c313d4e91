//! Balance repository: replay-based balances and trial balance.
//!
//! Balances are computed by replaying posted journal lines; the arithmetic
//! lives in `tally-core::balance` and this repository only fetches the rows
//! in replay order.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use tally_core::balance::{
    build_ledger, net_income, replay_balance, AccountBalance, AccountLedger, LineFact,
};
use tally_shared::types::AccountId;

use crate::entities::{accounts, journal_entries, journal_lines, sea_orm_active_enums};

/// Error types for balance operations.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Ledger window start has no preceding day.
    #[error("Ledger start date {0} has no preceding day")]
    StartDateOutOfRange(NaiveDate),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, FromQueryResult)]
struct LineFactRow {
    debit: Decimal,
    credit: Decimal,
    description: Option<String>,
    entry_date: NaiveDate,
    entry_number: String,
    entry_description: String,
}

impl From<LineFactRow> for LineFact {
    fn from(row: LineFactRow) -> Self {
        Self {
            entry_date: row.entry_date,
            entry_number: row.entry_number,
            description: row.description.unwrap_or(row.entry_description),
            debit: row.debit,
            credit: row.credit,
        }
    }
}

/// Balance repository.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes an account balance as of a date by full replay.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the query fails.
    pub async fn account_balance(
        &self,
        account_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Decimal, BalanceError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(BalanceError::AccountNotFound(account_id))?;

        let facts = self.line_facts(account_id, None, Some(as_of)).await?;
        Ok(replay_balance(account.account_type.into(), &facts))
    }

    /// Builds an account ledger over a date window with running balances.
    ///
    /// The opening balance is the full replay up to the day before `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the query fails.
    pub async fn ledger(
        &self,
        account_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AccountLedger, BalanceError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(BalanceError::AccountNotFound(account_id))?;
        let account_type = account.account_type.into();

        let before_start = start
            .checked_sub_days(Days::new(1))
            .ok_or(BalanceError::StartDateOutOfRange(start))?;

        let prior = self.line_facts(account_id, None, Some(before_start)).await?;
        let opening = replay_balance(account_type, &prior);

        let window = self.line_facts(account_id, Some(start), Some(end)).await?;
        Ok(build_ledger(account_type, opening, window))
    }

    /// Trial balance over all active accounts as of a date, in code order.
    ///
    /// Zero-activity accounts report a zero balance; report views that want
    /// only the active rows apply `retain_nonzero` themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn trial_balance(
        &self,
        company_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountBalance>, BalanceError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id))
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        let mut balances = Vec::with_capacity(accounts.len());
        for account in accounts {
            let facts = self.line_facts(account.id, None, Some(as_of)).await?;
            let total_debit: Decimal = facts.iter().map(|f| f.debit).sum();
            let total_credit: Decimal = facts.iter().map(|f| f.credit).sum();
            balances.push(AccountBalance::from_totals(
                AccountId::from_uuid(account.id),
                account.code,
                account.name,
                account.account_type.into(),
                total_debit,
                total_credit,
            ));
        }

        Ok(balances)
    }

    /// Net income over a date window: revenue minus expense activity with
    /// `start <= entry_date <= end`. Surfaced as a computed figure, never
    /// posted to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn net_income(
        &self,
        company_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal, BalanceError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id))
            .filter(accounts::Column::IsActive.eq(true))
            .filter(accounts::Column::AccountType.is_in([
                sea_orm_active_enums::AccountType::Revenue,
                sea_orm_active_enums::AccountType::Expense,
            ]))
            .all(&self.db)
            .await?;

        let mut balances = Vec::with_capacity(accounts.len());
        for account in accounts {
            let facts = self.line_facts(account.id, Some(start), Some(end)).await?;
            let total_debit: Decimal = facts.iter().map(|f| f.debit).sum();
            let total_credit: Decimal = facts.iter().map(|f| f.credit).sum();
            balances.push(AccountBalance::from_totals(
                AccountId::from_uuid(account.id),
                account.code,
                account.name,
                account.account_type.into(),
                total_debit,
                total_credit,
            ));
        }

        Ok(net_income(&balances))
    }

    /// Fetches posted line facts for an account within an optional date
    /// window, in replay order.
    async fn line_facts(
        &self,
        account_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<LineFact>, BalanceError> {
        let mut query = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id))
            .join(
                JoinType::InnerJoin,
                journal_lines::Relation::JournalEntries.def(),
            )
            .filter(journal_entries::Column::IsPosted.eq(true))
            .select_only()
            .column(journal_lines::Column::Debit)
            .column(journal_lines::Column::Credit)
            .column(journal_lines::Column::Description)
            .column(journal_entries::Column::EntryDate)
            .column(journal_entries::Column::EntryNumber)
            .column_as(journal_entries::Column::Description, "entry_description");

        if let Some(from) = from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        let rows: Vec<LineFactRow> = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::EntryNumber)
            .order_by_asc(journal_lines::Column::LineOrder)
            .into_model::<LineFactRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(LineFact::from).collect())
    }
}
