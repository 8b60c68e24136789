//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod journal;
pub mod ledger;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use journal::{JournalError, JournalRepository};
pub use ledger::{SeaOrmLedgerStore, store_error};
