//! Account balance calculations.
//!
//! Balances are always derived by replaying posted journal lines; nothing
//! in the system stores a mutable running total. This module holds the pure
//! arithmetic: signed contributions per the normal-balance rule, running
//! balances for ledger views, and trial-balance aggregation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use crate::account::AccountType;

/// A posted journal line as seen by balance computations.
///
/// The db crate produces these from `journal_lines` joined with their entry
/// header, ordered by entry date with ties broken by insertion order.
#[derive(Debug, Clone)]
pub struct LineFact {
    /// Accounting date of the parent entry.
    pub entry_date: NaiveDate,
    /// Entry number of the parent entry (`JE-#####`).
    pub entry_number: String,
    /// Description shown in the ledger (line description, falling back to
    /// the entry description).
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Computes an account balance by replaying line facts.
#[must_use]
pub fn replay_balance(account_type: AccountType, facts: &[LineFact]) -> Decimal {
    let normal = account_type.normal_balance();
    facts
        .iter()
        .map(|f| normal.signed_contribution(f.debit, f.credit))
        .sum()
}

/// One row of an account ledger with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry number.
    pub entry_number: String,
    /// Description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this row.
    pub running_balance: Decimal,
}

/// An account ledger over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedger {
    /// Balance going into the window (as of start - 1 day).
    pub opening_balance: Decimal,
    /// Rows within the window, in replay order.
    pub rows: Vec<LedgerRow>,
    /// Balance after the last row (equals `opening_balance` when empty).
    pub closing_balance: Decimal,
}

/// Builds a ledger view from an opening balance and the window's line facts.
///
/// `facts` must already be in replay order (entry date ascending, ties by
/// insertion order); the running balance accumulates signed contributions in
/// that order.
#[must_use]
pub fn build_ledger(
    account_type: AccountType,
    opening_balance: Decimal,
    facts: Vec<LineFact>,
) -> AccountLedger {
    let normal = account_type.normal_balance();
    let mut running = opening_balance;
    let rows = facts
        .into_iter()
        .map(|f| {
            running += normal.signed_contribution(f.debit, f.credit);
            LedgerRow {
                entry_date: f.entry_date,
                entry_number: f.entry_number,
                description: f.description,
                debit: f.debit,
                credit: f.credit,
                running_balance: running,
            }
        })
        .collect();

    AccountLedger {
        opening_balance,
        rows,
        closing_balance: running,
    }
}

/// An account's position in a trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total debits over the replayed window.
    pub total_debit: Decimal,
    /// Total credits over the replayed window.
    pub total_credit: Decimal,
    /// Net balance per the normal-balance rule.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Builds an account balance from replay totals.
    #[must_use]
    pub fn from_totals(
        account_id: AccountId,
        code: String,
        name: String,
        account_type: AccountType,
        total_debit: Decimal,
        total_credit: Decimal,
    ) -> Self {
        let balance = account_type
            .normal_balance()
            .signed_contribution(total_debit, total_credit);
        Self {
            account_id,
            code,
            name,
            account_type,
            total_debit,
            total_credit,
            balance,
        }
    }

    /// Returns true if the account saw any activity.
    #[must_use]
    pub fn has_activity(&self) -> bool {
        !self.total_debit.is_zero() || !self.total_credit.is_zero()
    }
}

/// Drops zero-activity accounts from a report view.
#[must_use]
pub fn retain_nonzero(balances: Vec<AccountBalance>) -> Vec<AccountBalance> {
    balances.into_iter().filter(AccountBalance::has_activity).collect()
}

/// Net income over a trial balance window: revenue minus expense balances.
///
/// Displayed as a computed retained-earnings line; never posted as an entry.
#[must_use]
pub fn net_income(balances: &[AccountBalance]) -> Decimal {
    let revenue: Decimal = balances
        .iter()
        .filter(|b| b.account_type == AccountType::Revenue)
        .map(|b| b.balance)
        .sum();
    let expense: Decimal = balances
        .iter()
        .filter(|b| b.account_type == AccountType::Expense)
        .map(|b| b.balance)
        .sum();
    revenue - expense
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn fact(day: u32, number: &str, debit: Decimal, credit: Decimal) -> LineFact {
        LineFact {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            entry_number: number.to_string(),
            description: "test".to_string(),
            debit,
            credit,
        }
    }

    #[test]
    fn test_replay_balance_debit_normal() {
        let facts = vec![
            fact(1, "JE-00001", dec!(1000000), dec!(0)),
            fact(2, "JE-00002", dec!(0), dec!(250000)),
        ];
        assert_eq!(replay_balance(AccountType::CashBank, &facts), dec!(750000));
    }

    #[test]
    fn test_replay_balance_credit_normal() {
        let facts = vec![fact(15, "JE-00001", dec!(0), dec!(1000000))];
        assert_eq!(replay_balance(AccountType::Revenue, &facts), dec!(1000000));
    }

    #[test]
    fn test_build_ledger_running_balance() {
        let facts = vec![
            fact(5, "JE-00001", dec!(100), dec!(0)),
            fact(6, "JE-00002", dec!(50), dec!(0)),
            fact(7, "JE-00003", dec!(0), dec!(30)),
        ];
        let ledger = build_ledger(AccountType::Asset, dec!(1000), facts);

        assert_eq!(ledger.opening_balance, dec!(1000));
        assert_eq!(ledger.rows[0].running_balance, dec!(1100));
        assert_eq!(ledger.rows[1].running_balance, dec!(1150));
        assert_eq!(ledger.rows[2].running_balance, dec!(1120));
        assert_eq!(ledger.closing_balance, dec!(1120));
    }

    #[test]
    fn test_empty_ledger_closing_equals_opening() {
        let ledger = build_ledger(AccountType::Liability, dec!(42), vec![]);
        assert!(ledger.rows.is_empty());
        assert_eq!(ledger.closing_balance, dec!(42));
    }

    #[test]
    fn test_account_balance_from_totals() {
        let b = AccountBalance::from_totals(
            AccountId::new(),
            "4000".into(),
            "Sales Revenue".into(),
            AccountType::Revenue,
            dec!(0),
            dec!(1000000),
        );
        assert_eq!(b.balance, dec!(1000000));
        assert!(b.has_activity());
    }

    #[test]
    fn test_retain_nonzero_drops_idle_accounts() {
        let idle = AccountBalance::from_totals(
            AccountId::new(),
            "1200".into(),
            "Inventory".into(),
            AccountType::Asset,
            dec!(0),
            dec!(0),
        );
        let busy = AccountBalance::from_totals(
            AccountId::new(),
            "1000".into(),
            "Cash".into(),
            AccountType::CashBank,
            dec!(10),
            dec!(0),
        );
        let kept = retain_nonzero(vec![idle, busy]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "1000");
    }

    #[test]
    fn test_net_income() {
        let balances = vec![
            AccountBalance::from_totals(
                AccountId::new(),
                "4000".into(),
                "Sales".into(),
                AccountType::Revenue,
                dec!(0),
                dec!(800),
            ),
            AccountBalance::from_totals(
                AccountId::new(),
                "5000".into(),
                "COGS".into(),
                AccountType::Expense,
                dec!(300),
                dec!(0),
            ),
            // Balance sheet accounts are ignored
            AccountBalance::from_totals(
                AccountId::new(),
                "1000".into(),
                "Cash".into(),
                AccountType::CashBank,
                dec!(500),
                dec!(0),
            ),
        ];
        assert_eq!(net_income(&balances), dec!(500));
    }

    // ========================================================================
    // Property: full replay equals the ledger's final running balance
    // ========================================================================

    fn facts_strategy() -> impl Strategy<Value = Vec<LineFact>> {
        prop::collection::vec(
            (1u32..=28, 0i64..1_000_000i64, prop::bool::ANY),
            0..30,
        )
        .prop_map(|raw| {
            let mut day_sorted: Vec<_> = raw;
            day_sorted.sort_by_key(|(day, _, _)| *day);
            day_sorted
                .into_iter()
                .enumerate()
                .map(|(i, (day, amount, is_debit))| {
                    let amount = Decimal::new(amount, 2);
                    LineFact {
                        entry_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                        entry_number: format!("JE-{:05}", i + 1),
                        description: String::new(),
                        debit: if is_debit { amount } else { Decimal::ZERO },
                        credit: if is_debit { Decimal::ZERO } else { amount },
                    }
                })
                .collect()
        })
    }

    fn account_type_strategy() -> impl Strategy<Value = AccountType> {
        prop::sample::select(AccountType::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For any line set and account type, the closing balance of a
        /// ledger built from a zero opening equals the full replay.
        #[test]
        fn prop_replay_equals_running_balance(
            facts in facts_strategy(),
            account_type in account_type_strategy(),
        ) {
            let replayed = replay_balance(account_type, &facts);
            let ledger = build_ledger(account_type, Decimal::ZERO, facts);
            prop_assert_eq!(ledger.closing_balance, replayed);
        }

        /// Splitting the window at any point and carrying the first half's
        /// closing balance as the second half's opening yields the same
        /// final balance.
        #[test]
        fn prop_ledger_window_split_consistent(
            facts in facts_strategy(),
            account_type in account_type_strategy(),
            split_seed in 0usize..100,
        ) {
            let split = if facts.is_empty() { 0 } else { split_seed % (facts.len() + 1) };
            let (head, tail) = facts.split_at(split);

            let full = build_ledger(account_type, Decimal::ZERO, facts.clone());
            let first = build_ledger(account_type, Decimal::ZERO, head.to_vec());
            let second = build_ledger(account_type, first.closing_balance, tail.to_vec());

            prop_assert_eq!(second.closing_balance, full.closing_balance);
        }
    }
}
