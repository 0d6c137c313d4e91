//! Property-based tests for journal entry validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::types::JournalLineInput;
use super::validation::{AccountRef, validate_entry};

fn active(id: AccountId) -> Option<AccountRef> {
    Some(AccountRef {
        id,
        is_active: true,
    })
}

/// Strategy for positive amounts with 2 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a balanced line set: N debit amounts mirrored by one credit
/// line carrying the total.
fn balanced_lines_strategy() -> impl Strategy<Value = Vec<JournalLineInput>> {
    prop::collection::vec(amount_strategy(), 1..8).prop_map(|amounts| {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<JournalLineInput> = amounts
            .into_iter()
            .map(|a| JournalLineInput::debit(AccountId::new(), a))
            .collect();
        lines.push(JournalLineInput::credit(AccountId::new(), total));
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any mirrored debit/credit set passes validation and reports equal
    /// totals.
    #[test]
    fn prop_balanced_sets_always_validate(lines in balanced_lines_strategy()) {
        let totals = validate_entry(&lines, active).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.total_debit, totals.total_credit);
    }

    /// Perturbing the credit side by more than the epsilon always fails with
    /// an unbalanced error carrying the exact difference.
    #[test]
    fn prop_perturbed_sets_always_rejected(
        lines in balanced_lines_strategy(),
        skew in 2i64..1_000i64,
    ) {
        let mut lines = lines;
        let last = lines.len() - 1;
        let skew = Decimal::new(skew, 2); // > 0.01
        lines[last].credit += skew;

        match validate_entry(&lines, active) {
            Err(super::error::JournalError::UnbalancedEntry { difference, .. }) => {
                prop_assert_eq!(difference, -skew);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    /// Validation is deterministic: the same input yields the same totals.
    #[test]
    fn prop_validation_deterministic(lines in balanced_lines_strategy()) {
        let a = validate_entry(&lines, active).unwrap();
        let b = validate_entry(&lines, active).unwrap();
        prop_assert_eq!(a.total_debit, b.total_debit);
        prop_assert_eq!(a.total_credit, b.total_credit);
    }
}
