//! Account type classification and the normal-balance rule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account type classification.
///
/// In double-entry bookkeeping the account type decides which side of an
/// entry increases the balance:
/// - Asset/CashBank/Expense accounts are debit-normal
/// - Liability/Equity/Revenue accounts are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account (receivables, inventory, fixed assets).
    Asset,
    /// Liability account (payables, loans).
    Liability,
    /// Equity account (capital, retained earnings).
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
    /// Cash and bank account, which behaves as an asset for balance purposes but
    /// is tracked as its own type for cash-overview reporting.
    CashBank,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::CashBank | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true if this account type is debit-normal.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self.normal_balance(), NormalBalance::Debit)
    }

    /// Returns true if this account type appears on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(
            self,
            Self::Asset | Self::CashBank | Self::Liability | Self::Equity
        )
    }

    /// Returns true if this account type appears on the income statement.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }

    /// All account types, in chart-of-accounts display order.
    pub const ALL: [Self; 6] = [
        Self::Asset,
        Self::CashBank,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::CashBank => "cash_bank",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            "cash_bank" => Ok(Self::CashBank),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// The side of an entry that increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalBalance {
    /// Signed contribution of a (debit, credit) pair to the balance.
    ///
    /// - Debit-normal: contribution = debit - credit
    /// - Credit-normal: contribution = credit - debit
    #[must_use]
    pub fn signed_contribution(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Errors for account code validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountCodeError {
    /// Account code cannot be empty.
    #[error("Account code cannot be empty")]
    Empty,

    /// Account code exceeds the maximum length.
    #[error("Account code '{0}' exceeds 20 characters")]
    TooLong(String),

    /// Account code contains characters outside [A-Za-z0-9.-].
    #[error("Account code '{0}' contains invalid characters")]
    InvalidCharacters(String),
}

/// Validates an account code before it reaches the registry.
///
/// # Errors
///
/// Returns an error if the code is empty, too long, or contains characters
/// outside the allowed set.
pub fn validate_account_code(code: &str) -> Result<(), AccountCodeError> {
    if code.is_empty() {
        return Err(AccountCodeError::Empty);
    }
    if code.len() > 20 {
        return Err(AccountCodeError::TooLong(code.to_string()));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(AccountCodeError::InvalidCharacters(code.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance_by_type() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::CashBank.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(
            AccountType::Liability.normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_signed_contribution_debit_normal() {
        let nb = NormalBalance::Debit;
        assert_eq!(nb.signed_contribution(dec!(100), dec!(0)), dec!(100));
        assert_eq!(nb.signed_contribution(dec!(0), dec!(50)), dec!(-50));
        assert_eq!(nb.signed_contribution(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_signed_contribution_credit_normal() {
        let nb = NormalBalance::Credit;
        assert_eq!(nb.signed_contribution(dec!(0), dec!(100)), dec!(100));
        assert_eq!(nb.signed_contribution(dec!(50), dec!(0)), dec!(-50));
        assert_eq!(nb.signed_contribution(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_statement_classification() {
        assert!(AccountType::Asset.is_balance_sheet());
        assert!(AccountType::CashBank.is_balance_sheet());
        assert!(AccountType::Equity.is_balance_sheet());
        assert!(!AccountType::Revenue.is_balance_sheet());
        assert!(AccountType::Revenue.is_income_statement());
        assert!(AccountType::Expense.is_income_statement());
        assert!(!AccountType::Liability.is_income_statement());
    }

    #[test]
    fn test_account_type_round_trip() {
        for ty in AccountType::ALL {
            let parsed: AccountType = ty.to_string().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn test_validate_account_code() {
        assert!(validate_account_code("1000").is_ok());
        assert!(validate_account_code("1-1001").is_ok());
        assert!(validate_account_code("4.100.SALES").is_ok());
        assert_eq!(validate_account_code(""), Err(AccountCodeError::Empty));
        assert!(matches!(
            validate_account_code("a".repeat(21).as_str()),
            Err(AccountCodeError::TooLong(_))
        ));
        assert!(matches!(
            validate_account_code("10 00"),
            Err(AccountCodeError::InvalidCharacters(_))
        ));
    }
}
