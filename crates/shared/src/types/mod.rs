//! Common type definitions.

pub mod id;
pub mod money;

pub use id::{
    AccountId, CompanyId, JournalEntryId, JournalLineId, OpeningBalanceId, PeriodClosingId, UserId,
};
pub use money::{BALANCE_EPSILON, is_balanced, within_epsilon};
