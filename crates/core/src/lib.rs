//! Core ledger business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `account` - Chart of accounts types and normal-balance rules
//! - `journal` - Journal entry validation and entry numbering
//! - `balance` - Balance replay, running balances, and trial balance
//! - `aging` - Outstanding-document aging classification
//! - `closing` - Period-closing snapshot computation

pub mod account;
pub mod aging;
pub mod balance;
pub mod closing;
pub mod journal;
