//! Period-closing snapshot computation.
//!
//! Closing a period never rewrites journal history. It validates that the
//! company's books balance as of the period end, then snapshots each
//! account's net position as an opening balance dated the day after the
//! period. Revenue and expense accounts are snapshotted like any other
//! account; nothing is zeroed out.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_shared::types::{within_epsilon, AccountId, BALANCE_EPSILON};
use thiserror::Error;

/// Lifecycle status of a period closing. Rows are append-only; reopening
/// flips the status rather than deleting the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingStatus {
    /// Period is closed; opening balances exist for the next period.
    Closed,
    /// Closing was reversed. The row and its opening balances remain for
    /// audit, superseded by any later closing.
    Reopened,
}

impl ClosingStatus {
    /// Valid status transitions: Closed -> Reopened only.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Closed, Self::Reopened))
    }
}

impl fmt::Display for ClosingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Reopened => write!(f, "reopened"),
        }
    }
}

/// Errors from the pure closing computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClosingValidationError {
    /// Period start falls after period end.
    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        /// Requested period start.
        start: NaiveDate,
        /// Requested period end.
        end: NaiveDate,
    },

    /// The trial balance as of period end does not balance.
    #[error(
        "Period does not balance: total debit {debit_total} != total credit {credit_total}, difference {difference}"
    )]
    UnbalancedPeriod {
        /// Sum of positive account nets.
        debit_total: Decimal,
        /// Sum of negative account nets, as a positive amount.
        credit_total: Decimal,
        /// Absolute difference between the two.
        difference: Decimal,
    },

    /// Requested status change is not allowed by the state machine.
    #[error("Invalid closing status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: ClosingStatus,
        /// Requested status.
        to: ClosingStatus,
    },

    /// `period_end + 1 day` is not representable.
    #[error("Period end {0} has no following day")]
    PeriodEndOutOfRange(NaiveDate),
}

/// An account's raw net position as of the period end: total debits minus
/// total credits, with no normal-balance signing applied.
#[derive(Debug, Clone, Copy)]
pub struct AccountNet {
    /// The account.
    pub account_id: AccountId,
    /// `total_debit - total_credit` over the account's full posted history.
    pub net: Decimal,
}

/// One opening-balance snapshot row, dated the day after the closed period.
/// Exactly one side is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBalanceRow {
    /// The account.
    pub account_id: AccountId,
    /// `period_end + 1 day`.
    pub balance_date: NaiveDate,
    /// Positive net, carried on the debit side.
    pub debit_balance: Decimal,
    /// Absolute value of a negative net, carried on the credit side.
    pub credit_balance: Decimal,
}

impl OpeningBalanceRow {
    /// The signed net this row represents.
    #[must_use]
    pub fn signed_net(&self) -> Decimal {
        self.debit_balance - self.credit_balance
    }
}

/// Validates that a requested period is well-formed.
pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), ClosingValidationError> {
    if start > end {
        return Err(ClosingValidationError::InvalidPeriod { start, end });
    }
    Ok(())
}

/// Computes the opening-balance snapshot for a period closing.
///
/// Positive nets go to the debit side, negative nets to the credit side.
/// The two sides must agree within [`BALANCE_EPSILON`] or the whole closing
/// is rejected and nothing should be persisted. Zero-net accounts produce
/// no row.
pub fn compute_opening_balances(
    nets: &[AccountNet],
    period_end: NaiveDate,
) -> Result<Vec<OpeningBalanceRow>, ClosingValidationError> {
    let balance_date = period_end
        .checked_add_days(Days::new(1))
        .ok_or(ClosingValidationError::PeriodEndOutOfRange(period_end))?;

    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    for net in nets {
        if net.net > Decimal::ZERO {
            debit_total += net.net;
        } else {
            credit_total += -net.net;
        }
    }

    if !within_epsilon(debit_total, credit_total) {
        return Err(ClosingValidationError::UnbalancedPeriod {
            debit_total,
            credit_total,
            difference: (debit_total - credit_total).abs(),
        });
    }

    let rows = nets
        .iter()
        .filter(|n| !n.net.is_zero())
        .map(|n| OpeningBalanceRow {
            account_id: n.account_id,
            balance_date,
            debit_balance: n.net.max(Decimal::ZERO),
            credit_balance: (-n.net).max(Decimal::ZERO),
        })
        .collect();

    Ok(rows)
}

/// Checks a status transition against the state machine.
pub fn validate_transition(
    from: ClosingStatus,
    to: ClosingStatus,
) -> Result<(), ClosingValidationError> {
    if !from.can_transition_to(to) {
        return Err(ClosingValidationError::InvalidTransition { from, to });
    }
    Ok(())
}

/// Largest imbalance the closing validation tolerates.
#[must_use]
pub const fn imbalance_tolerance() -> Decimal {
    BALANCE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn net(amount: Decimal) -> AccountNet {
        AccountNet {
            account_id: AccountId::new(),
            net: amount,
        }
    }

    #[test]
    fn test_snapshot_splits_sides_and_dates_next_day() {
        let nets = vec![net(dec!(1500)), net(dec!(-1000)), net(dec!(-500))];
        let rows = compute_opening_balances(&nets, ymd(2024, 1, 31)).unwrap();

        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.balance_date, ymd(2024, 2, 1));
            assert!(row.debit_balance.is_zero() || row.credit_balance.is_zero());
        }
        assert_eq!(rows[0].debit_balance, dec!(1500));
        assert_eq!(rows[1].credit_balance, dec!(1000));
        assert_eq!(rows[2].credit_balance, dec!(500));
    }

    #[test]
    fn test_zero_net_accounts_produce_no_row() {
        let nets = vec![net(dec!(0)), net(dec!(100)), net(dec!(-100))];
        let rows = compute_opening_balances(&nets, ymd(2024, 1, 31)).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_unbalanced_period_rejected_with_totals() {
        let nets = vec![net(dec!(1000)), net(dec!(-900))];
        let err = compute_opening_balances(&nets, ymd(2024, 1, 31)).unwrap_err();
        assert_eq!(
            err,
            ClosingValidationError::UnbalancedPeriod {
                debit_total: dec!(1000),
                credit_total: dec!(900),
                difference: dec!(100),
            }
        );
    }

    #[test]
    fn test_epsilon_imbalance_tolerated() {
        let nets = vec![net(dec!(100.00)), net(dec!(-99.99))];
        assert!(compute_opening_balances(&nets, ymd(2024, 1, 31)).is_ok());

        let nets = vec![net(dec!(100.00)), net(dec!(-99.98))];
        assert!(compute_opening_balances(&nets, ymd(2024, 1, 31)).is_err());
    }

    #[test]
    fn test_invalid_period() {
        assert!(validate_period(ymd(2024, 2, 1), ymd(2024, 1, 1)).is_err());
        assert!(validate_period(ymd(2024, 1, 1), ymd(2024, 1, 1)).is_ok());
    }

    #[rstest]
    #[case(ClosingStatus::Closed, ClosingStatus::Reopened, true)]
    #[case(ClosingStatus::Closed, ClosingStatus::Closed, false)]
    #[case(ClosingStatus::Reopened, ClosingStatus::Closed, false)]
    #[case(ClosingStatus::Reopened, ClosingStatus::Reopened, false)]
    fn test_status_transitions(
        #[case] from: ClosingStatus,
        #[case] to: ClosingStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(validate_transition(from, to).is_ok(), allowed);
    }

    // ========================================================================
    // Property: the snapshot is a lossless split of the nonzero nets
    // ========================================================================

    fn balanced_nets_strategy() -> impl Strategy<Value = Vec<AccountNet>> {
        prop::collection::vec(1i64..1_000_000i64, 1..20).prop_map(|amounts| {
            let mut nets: Vec<AccountNet> =
                amounts.iter().map(|a| net(Decimal::new(*a, 2))).collect();
            let total: Decimal = nets.iter().map(|n| n.net).sum();
            nets.push(net(-total));
            nets
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every row carries exactly one side, reconstructs its source net,
        /// and the two sides sum to the same total.
        #[test]
        fn prop_snapshot_round_trip(nets in balanced_nets_strategy()) {
            let rows = compute_opening_balances(&nets, ymd(2024, 12, 31)).unwrap();

            let nonzero: Vec<&AccountNet> =
                nets.iter().filter(|n| !n.net.is_zero()).collect();
            prop_assert_eq!(rows.len(), nonzero.len());

            for (row, source) in rows.iter().zip(nonzero) {
                prop_assert!(row.debit_balance.is_zero() || row.credit_balance.is_zero());
                prop_assert_eq!(row.signed_net(), source.net);
                prop_assert_eq!(row.balance_date, ymd(2025, 1, 1));
            }

            let debit: Decimal = rows.iter().map(|r| r.debit_balance).sum();
            let credit: Decimal = rows.iter().map(|r| r.credit_balance).sum();
            prop_assert_eq!(debit, credit);
        }
    }
}
