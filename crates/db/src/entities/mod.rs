//! `SeaORM` entity definitions for the ledger schema.

pub mod accounts;
pub mod companies;
pub mod journal_entries;
pub mod journal_lines;
pub mod opening_balances;
pub mod period_closings;
pub mod sea_orm_active_enums;
