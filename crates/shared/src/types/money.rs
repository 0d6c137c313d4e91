//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; balance comparisons use an
//! explicit epsilon so that rounding residue from upstream systems does not
//! reject otherwise sound entries.

use rust_decimal::Decimal;

/// Tolerance for balanced-ness comparisons, in currency units.
///
/// An entry whose |total debit - total credit| is at most this value is
/// considered balanced. The stored amounts are never adjusted.
pub const BALANCE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true if two amounts are equal within [`BALANCE_EPSILON`].
#[must_use]
pub fn within_epsilon(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= BALANCE_EPSILON
}

/// Returns true if total debits and total credits balance within
/// [`BALANCE_EPSILON`].
#[must_use]
pub fn is_balanced(total_debit: Decimal, total_credit: Decimal) -> bool {
    within_epsilon(total_debit, total_credit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_epsilon_value() {
        assert_eq!(BALANCE_EPSILON, dec!(0.01));
    }

    #[test]
    fn test_exact_amounts_balance() {
        assert!(is_balanced(dec!(1000000), dec!(1000000)));
        assert!(is_balanced(Decimal::ZERO, Decimal::ZERO));
    }

    #[rstest]
    #[case(dec!(100.00), dec!(100.01), true)]
    #[case(dec!(100.01), dec!(100.00), true)]
    #[case(dec!(100.00), dec!(100.011), false)]
    #[case(dec!(100.011), dec!(100.00), false)]
    #[case(dec!(500000), dec!(480000), false)]
    fn test_epsilon_boundary(
        #[case] debit: Decimal,
        #[case] credit: Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(is_balanced(debit, credit), expected);
    }

    #[test]
    fn test_within_epsilon_is_symmetric() {
        assert_eq!(
            within_epsilon(dec!(1.00), dec!(1.01)),
            within_epsilon(dec!(1.01), dec!(1.00))
        );
    }
}
