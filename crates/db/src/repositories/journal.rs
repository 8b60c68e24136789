//! Journal repository: recording, posting and voiding entries.
//!
//! Every write runs in one database transaction. The entry header is
//! inserted as a draft, its lines follow, and the header is then moved to
//! its target status so the deferred balance trigger sees the final lines.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use neraca_core::ledger::{
    self, JournalEntry, JournalEntryLine, LedgerError, NewJournalEntry, NewJournalLine,
    validate_entry,
};
use neraca_shared::AppError;
use neraca_shared::types::{AccountId, JournalEntryId};

use super::ledger::store_error;
use crate::entities::{accounts, journal_entries, journal_lines};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Entry rejected by ledger rules.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Ledger(err) => err.into(),
            JournalError::Database(err) => LedgerError::Store(store_error(err)).into(),
        }
    }
}

/// Repository for journal entry writes.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and posts a new entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AccountNotFound`/`AccountInactive` for a
    /// bad line account, or a database error. Nothing is written on error.
    pub async fn post_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, JournalError> {
        self.record_entry(entry, ledger::EntryStatus::Posted).await
    }

    /// Records an entry with the given status.
    ///
    /// Posted entries are fully validated; drafts and voided entries only
    /// need existing, active accounts.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post_entry`].
    pub async fn record_entry(
        &self,
        entry: NewJournalEntry,
        status: ledger::EntryStatus,
    ) -> Result<JournalEntry, JournalError> {
        if status == ledger::EntryStatus::Posted {
            validate_entry(&entry)?;
        }

        let txn = self.db.begin().await?;
        check_accounts(&txn, &entry.lines).await?;

        let entry_id = Uuid::now_v7();
        let now = chrono::Utc::now().into();
        let header = journal_entries::ActiveModel {
            id: Set(entry_id),
            entry_date: Set(entry.entry_date),
            reference: Set(entry.reference),
            description: Set(entry.description),
            status: Set(ledger::EntryStatus::Draft.into()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (line_number, line) in (1_i32..).zip(entry.lines) {
            journal_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                entry_id: Set(entry_id),
                line_number: Set(line_number),
                account_id: Set(line.account_id.into_inner()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                description: Set(line.description),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        let header = if status == ledger::EntryStatus::Draft {
            header
        } else {
            transition(&txn, header, status, entry.posted_by).await?
        };
        txn.commit().await?;

        info!(
            entry_id = %entry_id,
            reference = %header.reference,
            status = %status,
            "Journal entry recorded"
        );
        Ok(header.into())
    }

    /// Posts a draft entry after validating its stored lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidStatusTransition`, a validation
    /// error, or a database error.
    pub async fn post_draft(
        &self,
        id: JournalEntryId,
        posted_by: Option<String>,
    ) -> Result<JournalEntry, JournalError> {
        let txn = self.db.begin().await?;
        let header = find_for_update(&txn, id).await?;
        ensure_transition(header.status.into(), ledger::EntryStatus::Posted)?;

        let lines = load_lines(&txn, header.id).await?;
        let candidate = NewJournalEntry {
            entry_date: header.entry_date,
            reference: header.reference.clone(),
            description: header.description.clone(),
            posted_by: posted_by.clone(),
            lines: lines
                .into_iter()
                .map(|line| NewJournalLine {
                    account_id: AccountId::from_uuid(line.account_id),
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description,
                })
                .collect(),
        };
        validate_entry(&candidate)?;
        check_accounts(&txn, &candidate.lines).await?;

        let header = transition(&txn, header, ledger::EntryStatus::Posted, posted_by).await?;
        txn.commit().await?;

        info!(entry_id = %id, "Draft journal entry posted");
        Ok(header.into())
    }

    /// Voids a draft or posted entry, removing it from every balance.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidStatusTransition` for an entry that
    /// is already voided, or a database error.
    pub async fn void_entry(&self, id: JournalEntryId) -> Result<JournalEntry, JournalError> {
        let txn = self.db.begin().await?;
        let header = find_for_update(&txn, id).await?;
        ensure_transition(header.status.into(), ledger::EntryStatus::Voided)?;

        let header = transition(&txn, header, ledger::EntryStatus::Voided, None).await?;
        txn.commit().await?;

        info!(entry_id = %id, "Journal entry voided");
        Ok(header.into())
    }

    /// Loads an entry with its lines in line order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_entry(
        &self,
        id: JournalEntryId,
    ) -> Result<Option<(JournalEntry, Vec<JournalEntryLine>)>, JournalError> {
        let Some(header) = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let lines = load_lines(&self.db, header.id).await?;
        Ok(Some((
            header.into(),
            lines.into_iter().map(JournalEntryLine::from).collect(),
        )))
    }
}

fn ensure_transition(
    from: ledger::EntryStatus,
    to: ledger::EntryStatus,
) -> Result<(), LedgerError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(LedgerError::InvalidStatusTransition { from, to })
    }
}

async fn find_for_update<C: ConnectionTrait>(
    db: &C,
    id: JournalEntryId,
) -> Result<journal_entries::Model, JournalError> {
    journal_entries::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(id).into())
}

async fn load_lines<C: ConnectionTrait>(
    db: &C,
    entry_id: Uuid,
) -> Result<Vec<journal_lines::Model>, DbErr> {
    journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .order_by_asc(journal_lines::Column::LineNumber)
        .all(db)
        .await
}

/// Every line account must exist and be active.
async fn check_accounts<C: ConnectionTrait>(
    db: &C,
    lines: &[NewJournalLine],
) -> Result<(), JournalError> {
    let ids: BTreeSet<Uuid> = lines.iter().map(|line| line.account_id.into_inner()).collect();
    if ids.is_empty() {
        return Ok(());
    }

    let found: HashMap<Uuid, bool> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .column(accounts::Column::IsActive)
        .filter(accounts::Column::Id.is_in(ids))
        .into_tuple::<(Uuid, bool)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    for line in lines {
        match found.get(&line.account_id.into_inner()) {
            None => return Err(LedgerError::AccountNotFound(line.account_id).into()),
            Some(false) => return Err(LedgerError::AccountInactive(line.account_id).into()),
            Some(true) => {}
        }
    }
    Ok(())
}

async fn transition<C: ConnectionTrait>(
    db: &C,
    header: journal_entries::Model,
    next: ledger::EntryStatus,
    posted_by: Option<String>,
) -> Result<journal_entries::Model, DbErr> {
    let now = chrono::Utc::now().into();
    let mut active: journal_entries::ActiveModel = header.into();

    active.status = Set(next.into());
    match next {
        ledger::EntryStatus::Posted => {
            active.posted_at = Set(Some(now));
            active.posted_by = Set(posted_by);
        }
        ledger::EntryStatus::Voided => active.voided_at = Set(Some(now)),
        ledger::EntryStatus::Draft => {}
    }
    active.updated_at = Set(now);

    active.update(db).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_transition() {
        use ledger::EntryStatus::{Draft, Posted, Voided};

        assert!(ensure_transition(Draft, Posted).is_ok());
        assert!(ensure_transition(Posted, Voided).is_ok());
        assert!(matches!(
            ensure_transition(Voided, Posted),
            Err(LedgerError::InvalidStatusTransition {
                from: Voided,
                to: Posted,
            })
        ));
    }

    #[test]
    fn test_database_error_maps_to_app_error() {
        let err: AppError = JournalError::Database(DbErr::Custom("boom".into())).into();
        assert_eq!(err.status_code(), 500);

        let err: AppError = JournalError::Ledger(LedgerError::InsufficientLines).into();
        assert_eq!(err.status_code(), 400);
    }
}
