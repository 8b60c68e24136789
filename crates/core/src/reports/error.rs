//! Report error types.

use chrono::NaiveDate;
use neraca_shared::{AppError, types::AccountId};
use thiserror::Error;

use crate::ledger::StoreError;

/// Errors that can occur during report generation.
///
/// A ledger that does not balance is not an error: assemblers report it in
/// their `is_balanced` and `difference` fields.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Date string is not an ISO `YYYY-MM-DD` date.
    #[error("Invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// A comparative report was requested without any period.
    #[error("At least one period is required")]
    NoPeriods,

    /// The ledger store failed. Never retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::InvalidDateRange { .. }
            | ReportError::InvalidDate(_)
            | ReportError::NoPeriods => Self::InvalidRange(err.to_string()),
            ReportError::Store(_) => Self::Database(err.to_string()),
        }
    }
}
