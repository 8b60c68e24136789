//! Financial statement derivation.
//!
//! Assemblers are pure functions over per-account balances:
//! - Trial Balance
//! - Balance Sheet
//! - Profit and Loss
//! - Cash Flow (indirect method, simplified)
//! - Account and General Ledgers
//! - Comparative tables and period-over-period variance
//!
//! [`ReportService`] feeds them from a ledger store.

pub mod balance_sheet;
pub mod cash_flow;
pub mod comparative;
pub mod error;
pub mod ledger;
pub mod profit_loss;
pub mod service;
pub mod trial_balance;
pub mod types;
pub mod variance;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
pub use variance::{ProfitAndLossVariance, Variance};
