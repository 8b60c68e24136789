//! Postgres enum types and their mapping to the ledger domain.

use neraca_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "cost_of_sales")]
    CostOfSales,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "voided")]
    Voided,
}

impl From<AccountType> for ledger::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::CostOfSales => Self::CostOfSales,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<ledger::AccountType> for AccountType {
    fn from(value: ledger::AccountType) -> Self {
        match value {
            ledger::AccountType::Asset => Self::Asset,
            ledger::AccountType::Liability => Self::Liability,
            ledger::AccountType::Equity => Self::Equity,
            ledger::AccountType::Revenue => Self::Revenue,
            ledger::AccountType::CostOfSales => Self::CostOfSales,
            ledger::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<EntryStatus> for ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<ledger::EntryStatus> for EntryStatus {
    fn from(value: ledger::EntryStatus) -> Self {
        match value {
            ledger::EntryStatus::Draft => Self::Draft,
            ledger::EntryStatus::Posted => Self::Posted,
            ledger::EntryStatus::Voided => Self::Voided,
        }
    }
}
