//! Chart of accounts types and rules.
//!
//! Account types determine the normal-balance side used by every balance
//! computation; the type is immutable after creation because changing it
//! would flip the sign of historical balances.

pub mod template;
pub mod types;

pub use template::{TemplateAccount, default_chart};
pub use types::{AccountCodeError, AccountType, NormalBalance, validate_account_code};
