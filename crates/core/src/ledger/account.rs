//! Chart of accounts types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use neraca_shared::types::AccountId;

/// Account type. Decides the normal balance side and the statement an
/// account is reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income from operations.
    Revenue,
    /// Direct cost of goods or services sold.
    CostOfSales,
    /// Operating expense.
    Expense,
}

impl AccountType {
    /// All account types, in statement order.
    pub const ALL: [Self; 6] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::CostOfSales,
        Self::Expense,
    ];

    /// Returns the snake_case name used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::CostOfSales => "cost_of_sales",
            Self::Expense => "expense",
        }
    }

    /// Returns true for types reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns true for types reported on the profit and loss statement.
    #[must_use]
    pub const fn is_profit_and_loss(self) -> bool {
        !self.is_balance_sheet()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown account type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown account type: {0}")]
pub struct ParseAccountTypeError(pub String);

impl FromStr for AccountType {
    type Err = ParseAccountTypeError;

    /// Case-insensitive; accepts `cost_of_sales`, `cost-of-sales` and `COST_OF_SALES`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "cost_of_sales" => Ok(Self::CostOfSales),
            "expense" => Ok(Self::Expense),
            _ => Err(ParseAccountTypeError(s.to_string())),
        }
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Sortable hierarchical code, e.g. `1100`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type. Fixed once lines reference the account.
    pub account_type: AccountType,
    /// Inactive accounts are left out of statements.
    pub is_active: bool,
}

impl Account {
    /// Creates an active account with a fresh ID.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: AccountId::new(),
            code: code.into(),
            name: name.into(),
            account_type,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("asset", AccountType::Asset)]
    #[case("LIABILITY", AccountType::Liability)]
    #[case(" Equity ", AccountType::Equity)]
    #[case("revenue", AccountType::Revenue)]
    #[case("cost_of_sales", AccountType::CostOfSales)]
    #[case("cost-of-sales", AccountType::CostOfSales)]
    #[case("expense", AccountType::Expense)]
    fn test_parse_account_type(#[case] input: &str, #[case] expected: AccountType) {
        assert_eq!(input.parse::<AccountType>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_account_type() {
        let err = "contra".parse::<AccountType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown account type: contra");
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for account_type in AccountType::ALL {
            assert_eq!(account_type.to_string().parse::<AccountType>().unwrap(), account_type);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&AccountType::CostOfSales).unwrap();
        assert_eq!(json, "\"cost_of_sales\"");
    }

    #[test]
    fn test_statement_membership() {
        assert!(AccountType::Asset.is_balance_sheet());
        assert!(AccountType::Equity.is_balance_sheet());
        assert!(AccountType::CostOfSales.is_profit_and_loss());
        assert!(!AccountType::Liability.is_profit_and_loss());
    }
}
