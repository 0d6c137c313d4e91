//! Journal error types.
//!
//! Every failure is attributable to a specific cause; the engine never
//! recovers from a validation failure by guessing intent.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use thiserror::Error;

/// Errors that can occur while posting a journal entry.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// A line must have exactly one non-zero side.
    #[error("Line {line} must have exactly one of debit or credit non-zero")]
    AmbiguousLine {
        /// Zero-based index of the offending line.
        line: usize,
    },

    /// Line amounts cannot be negative.
    #[error("Line {line} has a negative amount")]
    NegativeAmount {
        /// Zero-based index of the offending line.
        line: usize,
    },

    /// Entry is not balanced (debits != credits beyond the epsilon).
    #[error(
        "Journal entry is not balanced: total debit {debit} != total credit {credit}, difference {difference}"
    )]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
        /// Debit minus credit.
        difference: Decimal,
    },

    // ========== Account Errors ==========
    /// Account does not exist in the company.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    InactiveAccount(AccountId),

    // ========== Concurrency Errors ==========
    /// Entry-number allocation raced with a concurrent posting.
    #[error("Concurrent posting detected for entry number {0}, please retry")]
    EntryNumberConflict(String),

    // ========== Infrastructure ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::AmbiguousLine { .. } => "AMBIGUOUS_LINE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::InactiveAccount(_) => "INACTIVE_ACCOUNT",
            Self::EntryNumberConflict(_) => "ENTRY_NUMBER_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if this error is retryable with fresh state.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::EntryNumberConflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unbalanced_display_names_the_difference() {
        let err = JournalError::UnbalancedEntry {
            debit: dec!(500000),
            credit: dec!(480000),
            difference: dec!(20000),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced: total debit 500000 != total credit 480000, difference 20000"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            JournalError::InsufficientLines(1).error_code(),
            "INSUFFICIENT_LINES"
        );
        assert_eq!(
            JournalError::AmbiguousLine { line: 0 }.error_code(),
            "AMBIGUOUS_LINE"
        );
        assert_eq!(
            JournalError::EntryNumberConflict("JE-00002".into()).error_code(),
            "ENTRY_NUMBER_CONFLICT"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(JournalError::EntryNumberConflict(String::new()).is_retryable());
        assert!(!JournalError::InsufficientLines(0).is_retryable());
        assert!(
            !JournalError::UnbalancedEntry {
                debit: dec!(1),
                credit: dec!(2),
                difference: dec!(-1),
            }
            .is_retryable()
        );
    }
}
