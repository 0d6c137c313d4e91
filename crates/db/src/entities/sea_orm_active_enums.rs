//! `SeaORM` active enums mapped to Postgres enum types.
//!
//! Each enum converts to and from its `tally-core` counterpart so that
//! repositories can hand rows straight to the pure domain logic.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account category, mirrors the `account_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset accounts.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability accounts.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity accounts.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue accounts.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense accounts.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Cash and bank accounts, debit-normal like assets.
    #[sea_orm(string_value = "cash_bank")]
    CashBank,
}

impl From<tally_core::account::AccountType> for AccountType {
    fn from(value: tally_core::account::AccountType) -> Self {
        match value {
            tally_core::account::AccountType::Asset => Self::Asset,
            tally_core::account::AccountType::Liability => Self::Liability,
            tally_core::account::AccountType::Equity => Self::Equity,
            tally_core::account::AccountType::Revenue => Self::Revenue,
            tally_core::account::AccountType::Expense => Self::Expense,
            tally_core::account::AccountType::CashBank => Self::CashBank,
        }
    }
}

impl From<AccountType> for tally_core::account::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
            AccountType::CashBank => Self::CashBank,
        }
    }
}

/// Source document type of a journal entry, mirrors `reference_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reference_type")]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// Manually keyed entry.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Sales invoice.
    #[sea_orm(string_value = "sales")]
    Sales,
    /// Purchase bill.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Payment or receipt.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Point-of-sale transaction.
    #[sea_orm(string_value = "pos")]
    Pos,
    /// Adjustment entry.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<tally_core::journal::ReferenceType> for ReferenceType {
    fn from(value: tally_core::journal::ReferenceType) -> Self {
        match value {
            tally_core::journal::ReferenceType::Manual => Self::Manual,
            tally_core::journal::ReferenceType::Sales => Self::Sales,
            tally_core::journal::ReferenceType::Purchase => Self::Purchase,
            tally_core::journal::ReferenceType::Payment => Self::Payment,
            tally_core::journal::ReferenceType::Pos => Self::Pos,
            tally_core::journal::ReferenceType::Adjustment => Self::Adjustment,
        }
    }
}

impl From<ReferenceType> for tally_core::journal::ReferenceType {
    fn from(value: ReferenceType) -> Self {
        match value {
            ReferenceType::Manual => Self::Manual,
            ReferenceType::Sales => Self::Sales,
            ReferenceType::Purchase => Self::Purchase,
            ReferenceType::Payment => Self::Payment,
            ReferenceType::Pos => Self::Pos,
            ReferenceType::Adjustment => Self::Adjustment,
        }
    }
}

/// Period closing status, mirrors `closing_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "closing_status")]
#[serde(rename_all = "snake_case")]
pub enum ClosingStatus {
    /// Period is closed.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Closing was reversed.
    #[sea_orm(string_value = "reopened")]
    Reopened,
}

impl From<tally_core::closing::ClosingStatus> for ClosingStatus {
    fn from(value: tally_core::closing::ClosingStatus) -> Self {
        match value {
            tally_core::closing::ClosingStatus::Closed => Self::Closed,
            tally_core::closing::ClosingStatus::Reopened => Self::Reopened,
        }
    }
}

impl From<ClosingStatus> for tally_core::closing::ClosingStatus {
    fn from(value: ClosingStatus) -> Self {
        match value {
            ClosingStatus::Closed => Self::Closed,
            ClosingStatus::Reopened => Self::Reopened,
        }
    }
}
