//! Account classification: normal balance side and statement bucket.
//!
//! Every signed balance in the crate goes through [`NormalSide`]. Nothing
//! else is allowed to decide whether a debit increases or decreases an
//! account.
//!
//! - Asset, CostOfSales, Expense: balance = debit - credit (debit-normal)
//! - Liability, Equity, Revenue: balance = credit - debit (credit-normal)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::ReportingConfig;

use super::account::AccountType;

/// The side on which an account's balance normally sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalSide {
    /// Returns the normal side for an account type.
    #[must_use]
    pub const fn of(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Asset | AccountType::CostOfSales | AccountType::Expense => Self::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => Self::Credit,
        }
    }

    /// Signed balance change for a debit/credit pair.
    ///
    /// Positive means the account moved in its normal direction.
    #[must_use]
    pub fn signed_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }

    /// +1 for debit-normal, -1 for credit-normal.
    #[must_use]
    pub const fn debit_weight(self) -> Decimal {
        match self {
            Self::Debit => Decimal::ONE,
            Self::Credit => Decimal::NEGATIVE_ONE,
        }
    }

    /// Cash effect of a balance sheet account changing by `balance` on this
    /// side. A net debit consumes cash, a net credit supplies it.
    #[must_use]
    pub fn cash_effect(self, balance: Decimal) -> Decimal {
        -(balance * self.debit_weight())
    }
}

/// Shorthand for [`NormalSide::of`].
#[must_use]
pub const fn normal_side(account_type: AccountType) -> NormalSide {
    NormalSide::of(account_type)
}

/// Statement category an account is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementBucket {
    /// Asset whose code matches a current-asset prefix.
    CurrentAsset,
    /// Any other asset.
    NonCurrentAsset,
    /// Liability whose code matches a current-liability prefix.
    CurrentLiability,
    /// Any other liability.
    NonCurrentLiability,
    /// Equity.
    Equity,
    /// Revenue.
    Revenue,
    /// Cost of sales.
    CostOfSales,
    /// Operating expense.
    Expense,
}

impl StatementBucket {
    /// Human readable heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CurrentAsset => "Current Assets",
            Self::NonCurrentAsset => "Non-Current Assets",
            Self::CurrentLiability => "Current Liabilities",
            Self::NonCurrentLiability => "Non-Current Liabilities",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::CostOfSales => "Cost of Sales",
            Self::Expense => "Operating Expenses",
        }
    }
}

/// Cash flow section for non-operating accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowActivity {
    /// Fixed asset purchases and disposals.
    Investing,
    /// Long-term borrowing and share capital.
    Financing,
}

/// Prefix-driven classifier built from deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountClassifier {
    current_asset_prefixes: Vec<String>,
    current_liability_prefixes: Vec<String>,
    fixed_asset_prefixes: Vec<String>,
    long_term_liability_prefixes: Vec<String>,
    share_capital_prefixes: Vec<String>,
}

impl AccountClassifier {
    /// Builds a classifier from the reporting configuration.
    #[must_use]
    pub fn from_config(config: &ReportingConfig) -> Self {
        Self {
            current_asset_prefixes: config.current_asset_prefixes.clone(),
            current_liability_prefixes: config.current_liability_prefixes.clone(),
            fixed_asset_prefixes: config.fixed_asset_prefixes.clone(),
            long_term_liability_prefixes: config.long_term_liability_prefixes.clone(),
            share_capital_prefixes: config.share_capital_prefixes.clone(),
        }
    }

    /// Normal side of an account type.
    #[must_use]
    pub const fn normal_side(&self, account_type: AccountType) -> NormalSide {
        NormalSide::of(account_type)
    }

    /// Statement bucket for an account.
    #[must_use]
    pub fn statement_bucket(&self, code: &str, account_type: AccountType) -> StatementBucket {
        match account_type {
            AccountType::Asset if has_prefix(code, &self.current_asset_prefixes) => {
                StatementBucket::CurrentAsset
            }
            AccountType::Asset => StatementBucket::NonCurrentAsset,
            AccountType::Liability if has_prefix(code, &self.current_liability_prefixes) => {
                StatementBucket::CurrentLiability
            }
            AccountType::Liability => StatementBucket::NonCurrentLiability,
            AccountType::Equity => StatementBucket::Equity,
            AccountType::Revenue => StatementBucket::Revenue,
            AccountType::CostOfSales => StatementBucket::CostOfSales,
            AccountType::Expense => StatementBucket::Expense,
        }
    }

    /// Returns true if the code is in the fixed asset group.
    #[must_use]
    pub fn is_fixed_asset(&self, code: &str) -> bool {
        has_prefix(code, &self.fixed_asset_prefixes)
    }

    /// Returns true if the code is in the long-term liability or share capital group.
    #[must_use]
    pub fn is_financing(&self, code: &str) -> bool {
        has_prefix(code, &self.long_term_liability_prefixes)
            || has_prefix(code, &self.share_capital_prefixes)
    }

    /// Cash flow section for an account code, if it is not operating.
    ///
    /// Groups are matched by code only. A code matching both groups is investing.
    #[must_use]
    pub fn cash_flow_activity(&self, code: &str) -> Option<CashFlowActivity> {
        if self.is_fixed_asset(code) {
            Some(CashFlowActivity::Investing)
        } else if self.is_financing(code) {
            Some(CashFlowActivity::Financing)
        } else {
            None
        }
    }
}

impl Default for AccountClassifier {
    fn default() -> Self {
        Self::from_config(&ReportingConfig::default())
    }
}

fn has_prefix(code: &str, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && code.starts_with(prefix.as_str()))
}
