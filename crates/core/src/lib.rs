//! Core business logic for Neraca.
//!
//! This crate contains the ledger and reporting logic with ZERO web or
//! database dependencies. Storage is reached through the
//! [`ledger::LedgerStore`] trait.
//!
//! # Modules
//!
//! - `ledger` - Accounts, journal entries, classification, balances
//! - `period` - Date ranges, ISO date parsing, the injected clock
//! - `reports` - Trial balance, balance sheet, P&L, cash flow, ledgers

pub mod ledger;
pub mod period;
pub mod reports;
