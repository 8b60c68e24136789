//! Ledger error types.
//!
//! [`StoreError`] covers failures of the ledger store itself and is
//! propagated unchanged by every read path. [`LedgerError`] covers the
//! write side: posting validation and entry state transitions.

use rust_decimal::Decimal;
use thiserror::Error;

use neraca_shared::{
    AppError,
    types::{AccountId, JournalEntryId},
};

use super::entry::EntryStatus;

/// Errors raised by a ledger store backend.
///
/// Never retried by callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed a query.
    #[error("Ledger store query failed: {0}")]
    Query(String),
}

/// Errors that can occur while recording or posting journal entries.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Line has neither a debit nor a credit.
    #[error("Line must have a non-zero debit or credit")]
    ZeroAmount,

    /// Line carries both a debit and a credit.
    #[error("Line must specify either debit or credit, not both")]
    TwoSidedLine,

    /// All lines are on the same side.
    #[error("Journal entry must have both debit and credit lines")]
    SingleSided,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Another account already uses this code.
    #[error("Account code {0} is already in use")]
    DuplicateAccountCode(String),

    /// Account type cannot be changed because lines reference the account.
    #[error("Cannot change account type for account {0} because it has journal lines")]
    AccountTypeLocked(AccountId),

    // ========== Entry State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry cannot move from its current status to the requested one.
    #[error("Cannot move journal entry from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
    },

    // ========== Store Errors ==========
    /// The ledger store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::TwoSidedLine => "TWO_SIDED_LINE",
            Self::SingleSided => "SINGLE_SIDED",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::AccountTypeLocked(_) => "ACCOUNT_TYPE_LOCKED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true for validation failures of the entry itself.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InsufficientLines
                | Self::NegativeAmount
                | Self::ZeroAmount
                | Self::TwoSidedLine
                | Self::SingleSided
                | Self::Unbalanced { .. }
        )
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(_) | LedgerError::EntryNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::Store(_) => Self::Database(err.to_string()),
            _ if err.is_validation() => Self::Validation(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
