//! Double-entry ledger.
//!
//! - Chart of accounts and journal entry types
//! - Account classification (normal side, statement bucket)
//! - The ledger store seam and an in-memory store
//! - Balance calculation and running ledgers
//! - Posting validation for new entries

pub mod account;
pub mod balance;
pub mod classifier;
pub mod entry;
pub mod error;
pub mod memory;
pub mod running;
pub mod store;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountType, ParseAccountTypeError};
pub use balance::{BalanceCalculator, BalanceTotals, DebitCreditBalance};
pub use classifier::{AccountClassifier, CashFlowActivity, NormalSide, StatementBucket, normal_side};
pub use entry::{
    EntryStatus, JournalEntry, JournalEntryLine, NewJournalEntry, NewJournalLine, PostedLine,
};
pub use error::{LedgerError, StoreError};
pub use memory::InMemoryLedgerStore;
pub use running::{Movement, RunningLedger};
pub use store::{AccountFilter, LedgerStore, LineFilter};
pub use validation::{EntryTotals, validate_entry};
