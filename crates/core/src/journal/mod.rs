//! Journal entry validation and numbering.
//!
//! The journal is the single write path for financial facts. This module
//! holds the pure half of that path: input types, the ordered validation
//! rules (line count, one-sided lines, epsilon-balanced totals), and the
//! `JE-#####` entry-number scheme. Persistence and the transaction boundary
//! live in the db crate.

pub mod entry_number;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use entry_number::{format_entry_number, next_entry_number, parse_entry_number};
pub use error::JournalError;
pub use types::{EntryTotals, JournalLineInput, PostEntryInput, ReferenceType};
pub use validation::{AccountRef, validate_entry};
