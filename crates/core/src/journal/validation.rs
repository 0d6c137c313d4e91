//! Business rule validation for journal entries.
//!
//! Rules are checked in a fixed order so callers always get the most
//! fundamental failure first: line count, line shape, account resolution,
//! balance.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::error::JournalError;
use super::types::{EntryTotals, JournalLineInput};

/// The account facts validation needs.
///
/// The db crate resolves these inside the posting transaction; tests supply
/// them directly.
#[derive(Debug, Clone, Copy)]
pub struct AccountRef {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Validates a set of journal lines and computes the entry totals.
///
/// Checks, in order:
/// 1. at least 2 lines
/// 2. every line has exactly one non-zero, non-negative side
/// 3. every account resolves and is active
/// 4. total debits equal total credits within the balance epsilon
///
/// # Errors
///
/// Returns the first violated rule as a [`JournalError`].
pub fn validate_entry<R>(
    lines: &[JournalLineInput],
    resolve_account: R,
) -> Result<EntryTotals, JournalError>
where
    R: Fn(AccountId) -> Option<AccountRef>,
{
    if lines.len() < 2 {
        return Err(JournalError::InsufficientLines(lines.len()));
    }

    for (index, line) in lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(JournalError::NegativeAmount { line: index });
        }
        let debit_set = line.debit > Decimal::ZERO;
        let credit_set = line.credit > Decimal::ZERO;
        if debit_set == credit_set {
            // both zero, or both non-zero
            return Err(JournalError::AmbiguousLine { line: index });
        }
    }

    for line in lines {
        let account = resolve_account(line.account_id)
            .ok_or(JournalError::UnknownAccount(line.account_id))?;
        if !account.is_active {
            return Err(JournalError::InactiveAccount(account.id));
        }
    }

    let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
    let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
    let totals = EntryTotals::new(total_debit, total_credit);

    if !totals.is_balanced {
        return Err(JournalError::UnbalancedEntry {
            debit: totals.total_debit,
            credit: totals.total_credit,
            difference: totals.difference(),
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn active(id: AccountId) -> Option<AccountRef> {
        Some(AccountRef {
            id,
            is_active: true,
        })
    }

    fn balanced_lines() -> Vec<JournalLineInput> {
        let cash = AccountId::new();
        let revenue = AccountId::new();
        vec![
            JournalLineInput::debit(cash, dec!(1000000)),
            JournalLineInput::credit(revenue, dec!(1000000)),
        ]
    }

    #[test]
    fn test_balanced_entry_accepted() {
        let totals = validate_entry(&balanced_lines(), active).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, dec!(1000000));
        assert_eq!(totals.total_credit, dec!(1000000));
    }

    #[test]
    fn test_single_line_rejected() {
        let lines = vec![JournalLineInput::debit(AccountId::new(), dec!(100))];
        assert!(matches!(
            validate_entry(&lines, active),
            Err(JournalError::InsufficientLines(1))
        ));
    }

    #[test]
    fn test_line_with_both_sides_rejected() {
        let mut lines = balanced_lines();
        lines[0].credit = dec!(1);
        assert!(matches!(
            validate_entry(&lines, active),
            Err(JournalError::AmbiguousLine { line: 0 })
        ));
    }

    #[test]
    fn test_line_with_neither_side_rejected() {
        let mut lines = balanced_lines();
        lines[1].credit = Decimal::ZERO;
        assert!(matches!(
            validate_entry(&lines, active),
            Err(JournalError::AmbiguousLine { line: 1 })
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut lines = balanced_lines();
        lines[0].debit = dec!(-100);
        assert!(matches!(
            validate_entry(&lines, active),
            Err(JournalError::NegativeAmount { line: 0 })
        ));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let lines = balanced_lines();
        let missing = lines[1].account_id;
        let resolver = move |id: AccountId| {
            if id == missing {
                None
            } else {
                active(id)
            }
        };
        assert!(matches!(
            validate_entry(&lines, resolver),
            Err(JournalError::UnknownAccount(id)) if id == missing
        ));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let lines = balanced_lines();
        let inactive = lines[0].account_id;
        let resolver = move |id: AccountId| {
            Some(AccountRef {
                id,
                is_active: id != inactive,
            })
        };
        assert!(matches!(
            validate_entry(&lines, resolver),
            Err(JournalError::InactiveAccount(id)) if id == inactive
        ));
    }

    #[test]
    fn test_unbalanced_entry_rejected_with_detail() {
        let cash = AccountId::new();
        let revenue = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(cash, dec!(500000)),
            JournalLineInput::credit(revenue, dec!(480000)),
        ];
        match validate_entry(&lines, active) {
            Err(JournalError::UnbalancedEntry {
                debit,
                credit,
                difference,
            }) => {
                assert_eq!(debit, dec!(500000));
                assert_eq!(credit, dec!(480000));
                assert_eq!(difference, dec!(20000));
            }
            other => panic!("expected UnbalancedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_rounding_residue_within_epsilon_accepted() {
        let a = AccountId::new();
        let b = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(a, dec!(33.33)),
            JournalLineInput::credit(b, dec!(33.34)),
        ];
        let totals = validate_entry(&lines, active).unwrap();
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_residue_beyond_epsilon_rejected() {
        let a = AccountId::new();
        let b = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(a, dec!(33.33)),
            JournalLineInput::credit(b, dec!(33.35)),
        ];
        assert!(matches!(
            validate_entry(&lines, active),
            Err(JournalError::UnbalancedEntry { .. })
        ));
    }
}
