//! Default chart-of-accounts template.
//!
//! Used to bootstrap a new company with a minimal working chart. Codes follow
//! the common 1xxx assets / 2xxx liabilities / 3xxx equity / 4xxx revenue /
//! 5xxx expenses convention.

use super::types::AccountType;

/// One account in a chart template.
#[derive(Debug, Clone)]
pub struct TemplateAccount {
    /// Account code.
    pub code: &'static str,
    /// Account name.
    pub name: &'static str,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account code, if any.
    pub parent_code: Option<&'static str>,
}

/// Returns the default chart of accounts for a new company.
///
/// Parents are listed before their children so the template can be inserted
/// in order.
#[must_use]
pub fn default_chart() -> Vec<TemplateAccount> {
    use AccountType::{Asset, CashBank, Equity, Expense, Liability, Revenue};

    vec![
        TemplateAccount { code: "1000", name: "Cash on Hand", account_type: CashBank, parent_code: None },
        TemplateAccount { code: "1010", name: "Bank Account", account_type: CashBank, parent_code: None },
        TemplateAccount { code: "1100", name: "Accounts Receivable", account_type: Asset, parent_code: None },
        TemplateAccount { code: "1200", name: "Inventory", account_type: Asset, parent_code: None },
        TemplateAccount { code: "1500", name: "Fixed Assets", account_type: Asset, parent_code: None },
        TemplateAccount { code: "2000", name: "Accounts Payable", account_type: Liability, parent_code: None },
        TemplateAccount { code: "2100", name: "Tax Payable", account_type: Liability, parent_code: None },
        TemplateAccount { code: "3000", name: "Owner's Capital", account_type: Equity, parent_code: None },
        TemplateAccount { code: "3100", name: "Retained Earnings", account_type: Equity, parent_code: None },
        TemplateAccount { code: "4000", name: "Sales Revenue", account_type: Revenue, parent_code: None },
        TemplateAccount { code: "4100", name: "Other Income", account_type: Revenue, parent_code: None },
        TemplateAccount { code: "5000", name: "Cost of Goods Sold", account_type: Expense, parent_code: None },
        TemplateAccount { code: "5100", name: "Operating Expenses", account_type: Expense, parent_code: None },
        TemplateAccount { code: "5110", name: "Salaries", account_type: Expense, parent_code: Some("5100") },
        TemplateAccount { code: "5120", name: "Rent", account_type: Expense, parent_code: Some("5100") },
        TemplateAccount { code: "5130", name: "Utilities", account_type: Expense, parent_code: Some("5100") },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::validate_account_code;
    use std::collections::HashSet;

    #[test]
    fn test_template_codes_unique_and_valid() {
        let chart = default_chart();
        let mut seen = HashSet::new();
        for account in &chart {
            assert!(validate_account_code(account.code).is_ok());
            assert!(seen.insert(account.code), "duplicate code {}", account.code);
        }
    }

    #[test]
    fn test_template_parents_precede_children() {
        let chart = default_chart();
        let mut seen = HashSet::new();
        for account in &chart {
            if let Some(parent) = account.parent_code {
                assert!(seen.contains(parent), "parent {parent} not yet defined");
            }
            seen.insert(account.code);
        }
    }

    #[test]
    fn test_template_covers_every_account_type() {
        let chart = default_chart();
        for ty in AccountType::ALL {
            assert!(
                chart.iter().any(|a| a.account_type == ty),
                "no template account of type {ty}"
            );
        }
    }
}
