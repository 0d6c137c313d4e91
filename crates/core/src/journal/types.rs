//! Domain types for journal entry creation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::money::is_balanced;
use tally_shared::types::{AccountId, CompanyId, UserId};
use uuid::Uuid;

/// Source of a journal entry.
///
/// Every module that creates a financial fact tags its entries so reports
/// can trace a line back to the originating document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// Manually keyed entry.
    Manual,
    /// Sales invoice.
    Sales,
    /// Purchase bill.
    Purchase,
    /// Incoming or outgoing payment.
    Payment,
    /// Point-of-sale transaction.
    Pos,
    /// Adjustment entry.
    Adjustment,
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Manual => "manual",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::Payment => "payment",
            Self::Pos => "pos",
            Self::Adjustment => "adjustment",
        };
        write!(f, "{s}")
    }
}

/// Input for a single line in a journal entry.
///
/// Exactly one of `debit`/`credit` must be non-zero; that rule is enforced
/// by validation, not by the type.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for posting a journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// The company this entry belongs to.
    pub company_id: CompanyId,
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// A description of the entry.
    pub description: String,
    /// What kind of document produced this entry.
    pub reference_type: ReferenceType,
    /// Optional link to the originating document.
    pub reference_id: Option<Uuid>,
    /// The lines (must have at least 2).
    pub lines: Vec<JournalLineInput>,
    /// The user posting the entry.
    pub created_by: UserId,
}

/// Entry totals for validation and display.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Whether the entry balances within the epsilon.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates entry totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: is_balanced(total_debit, total_credit),
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_totals_balanced() {
        let totals = EntryTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_entry_totals_balanced_within_epsilon() {
        let totals = EntryTotals::new(dec!(100.00), dec!(100.01));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), dec!(-0.01));
    }

    #[test]
    fn test_entry_totals_unbalanced() {
        let totals = EntryTotals::new(dec!(500000), dec!(480000));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(20000));
    }

    #[test]
    fn test_line_constructors() {
        let account = AccountId::new();
        let d = JournalLineInput::debit(account, dec!(10));
        assert_eq!(d.debit, dec!(10));
        assert_eq!(d.credit, Decimal::ZERO);

        let c = JournalLineInput::credit(account, dec!(10));
        assert_eq!(c.credit, dec!(10));
        assert_eq!(c.debit, Decimal::ZERO);
    }
}
