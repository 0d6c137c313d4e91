//! Repository layer for data access.
//!
//! Each repository owns a `DatabaseConnection` clone and exposes async
//! operations for one concern. Validation lives in `tally-core`; the
//! repositories feed it rows and persist its results.

pub mod account;
pub mod balance;
pub mod closing;
pub mod company;
pub mod journal;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use balance::{BalanceError, BalanceRepository};
pub use closing::{ClosePeriodInput, ClosingError, ClosingRepository};
pub use company::{CompanyError, CompanyRepository};
pub use journal::{EntryWithLines, JournalRepository, PostingError};

use tally_core::closing::ClosingValidationError;
use tally_core::journal::JournalError;
use tally_shared::AppError;

// Embedding applications see one error surface. Each repository error folds
// into the `AppError` taxonomy; messages come from the source display.

impl From<CompanyError> for AppError {
    fn from(err: CompanyError) -> Self {
        let msg = err.to_string();
        match err {
            CompanyError::NotFound(_) => Self::NotFound(msg),
            CompanyError::Database(_) => Self::Database(msg),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        let msg = err.to_string();
        match err {
            AccountError::DuplicateCode(_) => Self::Conflict(msg),
            AccountError::InvalidCode(_)
            | AccountError::ParentNotFound(_)
            | AccountError::ParentWrongCompany => Self::Validation(msg),
            AccountError::AccountNotFound(_) => Self::NotFound(msg),
            AccountError::TemplateParentMissing(_) => Self::Internal(msg),
            AccountError::Database(_) => Self::Database(msg),
        }
    }
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        let msg = err.to_string();
        match err {
            PostingError::Validation(JournalError::UnbalancedEntry { .. }) => {
                Self::BusinessRule(msg)
            }
            PostingError::Validation(JournalError::Database(_)) => Self::Database(msg),
            PostingError::Validation(JournalError::EntryNumberConflict(_))
            | PostingError::NumberAllocationExhausted(_) => Self::Conflict(msg),
            PostingError::Validation(_) => Self::Validation(msg),
            PostingError::EntryNotFound(_) => Self::NotFound(msg),
            PostingError::Database(_) => Self::Database(msg),
        }
    }
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        let msg = err.to_string();
        match err {
            BalanceError::AccountNotFound(_) => Self::NotFound(msg),
            BalanceError::StartDateOutOfRange(_) => Self::Validation(msg),
            BalanceError::Database(_) => Self::Database(msg),
        }
    }
}

impl From<ClosingError> for AppError {
    fn from(err: ClosingError) -> Self {
        let msg = err.to_string();
        match err {
            ClosingError::PeriodAlreadyClosed { .. }
            | ClosingError::Validation(
                ClosingValidationError::UnbalancedPeriod { .. }
                | ClosingValidationError::InvalidTransition { .. },
            ) => Self::BusinessRule(msg),
            ClosingError::ClosingNotFound(_) => Self::NotFound(msg),
            ClosingError::Validation(_) => Self::Validation(msg),
            ClosingError::Database(_) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_account_errors_fold_into_app_error() {
        let err: AppError = AccountError::DuplicateCode("1000".into()).into();
        assert_eq!(err.error_code(), "CONFLICT");

        let err: AppError = AccountError::AccountNotFound(Uuid::nil()).into();
        assert_eq!(err.error_code(), "NOT_FOUND");

        let err: AppError = AccountError::ParentWrongCompany.into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_posting_errors_fold_into_app_error() {
        let err: AppError = PostingError::Validation(JournalError::UnbalancedEntry {
            debit: dec!(500000),
            credit: dec!(480000),
            difference: dec!(20000),
        })
        .into();
        assert_eq!(err.error_code(), "BUSINESS_RULE_VIOLATION");
        assert!(!err.is_retryable());

        let err: AppError = PostingError::Validation(JournalError::InsufficientLines(1)).into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err: AppError = PostingError::NumberAllocationExhausted(5).into();
        assert_eq!(err.error_code(), "CONFLICT");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_closing_errors_fold_into_app_error() {
        let err: AppError = ClosingError::PeriodAlreadyClosed {
            period_end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        }
        .into();
        assert_eq!(err.error_code(), "BUSINESS_RULE_VIOLATION");

        let err: AppError = ClosingError::Validation(ClosingValidationError::InvalidPeriod {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        })
        .into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err: AppError = ClosingError::ClosingNotFound(Uuid::nil()).into();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
