//! In-process ledger store.
//!
//! Keeps accounts and entries behind a single `RwLock`. Every write takes
//! the write lock once, so an entry and all its lines become visible
//! together.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use neraca_shared::types::{AccountId, JournalEntryId, JournalLineId};

use super::account::Account;
use super::entry::{
    EntryStatus, JournalEntry, JournalEntryLine, NewJournalEntry, NewJournalLine, PostedLine,
};
use super::error::{LedgerError, StoreError};
use super::store::{AccountFilter, LedgerStore, LineFilter};
use super::validation::validate_entry;

#[derive(Debug, Clone)]
struct StoredEntry {
    header: JournalEntry,
    lines: Vec<JournalEntryLine>,
}

#[derive(Debug, Default)]
struct State {
    accounts: BTreeMap<AccountId, Account>,
    /// Insertion order is the posting sequence used as the ordering tiebreak.
    entries: Vec<StoredEntry>,
}

impl State {
    fn has_lines(&self, account_id: AccountId) -> bool {
        self.entries
            .iter()
            .flat_map(|entry| &entry.lines)
            .any(|line| line.account_id == account_id)
    }

    fn code_taken(&self, code: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|account| account.code == code && Some(account.id) != except)
    }

    fn entry_mut(&mut self, id: JournalEntryId) -> Result<&mut StoredEntry, LedgerError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.header.id == id)
            .ok_or(LedgerError::EntryNotFound(id))
    }

    fn check_postable(&self, entry: &NewJournalEntry) -> Result<(), LedgerError> {
        for line in &entry.lines {
            let account = self
                .accounts
                .get(&line.account_id)
                .ok_or(LedgerError::AccountNotFound(line.account_id))?;
            if !account.is_active {
                return Err(LedgerError::AccountInactive(account.id));
            }
        }
        Ok(())
    }
}

/// Ledger store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account to the chart.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccountCode` if the code is already used.
    pub async fn add_account(&self, account: Account) -> Result<AccountId, LedgerError> {
        let mut state = self.state.write().await;
        if state.code_taken(&account.code, None) {
            return Err(LedgerError::DuplicateAccountCode(account.code));
        }
        let id = account.id;
        state.accounts.insert(id, account);
        Ok(id)
    }

    /// Replaces an existing account's attributes.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `DuplicateAccountCode`, or
    /// `AccountTypeLocked` when the type changes after lines reference it.
    pub async fn update_account(&self, account: Account) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        let current_type = state
            .accounts
            .get(&account.id)
            .map(|existing| existing.account_type)
            .ok_or(LedgerError::AccountNotFound(account.id))?;

        if current_type != account.account_type && state.has_lines(account.id) {
            return Err(LedgerError::AccountTypeLocked(account.id));
        }
        if state.code_taken(&account.code, Some(account.id)) {
            return Err(LedgerError::DuplicateAccountCode(account.code));
        }
        state.accounts.insert(account.id, account);
        Ok(())
    }

    /// Validates and posts a new entry in one step.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or `AccountNotFound`/`AccountInactive`
    /// for a bad line account. Nothing is written on error.
    pub async fn post_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError> {
        self.record_entry(entry, EntryStatus::Posted).await
    }

    /// Records an entry with the given status.
    ///
    /// Posted entries are fully validated; drafts and voided entries only
    /// need existing accounts.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post_entry`] for posted entries.
    pub async fn record_entry(
        &self,
        entry: NewJournalEntry,
        status: EntryStatus,
    ) -> Result<JournalEntry, LedgerError> {
        if status == EntryStatus::Posted {
            validate_entry(&entry)?;
        }

        let mut state = self.state.write().await;
        state.check_postable(&entry)?;

        let id = JournalEntryId::new();
        let posted = status == EntryStatus::Posted;
        let header = JournalEntry {
            id,
            entry_date: entry.entry_date,
            reference: entry.reference,
            description: entry.description,
            status,
            posted_at: posted.then(Utc::now),
            posted_by: if posted { entry.posted_by } else { None },
        };
        let lines = entry
            .lines
            .into_iter()
            .map(|line| JournalEntryLine {
                id: JournalLineId::new(),
                entry_id: id,
                account_id: line.account_id,
                debit: line.debit,
                credit: line.credit,
                description: line.description,
            })
            .collect();

        state.entries.push(StoredEntry {
            header: header.clone(),
            lines,
        });
        Ok(header)
    }

    /// Posts a draft entry after validating its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidStatusTransition`, or a validation error.
    pub async fn post_draft(
        &self,
        id: JournalEntryId,
        posted_by: Option<String>,
    ) -> Result<JournalEntry, LedgerError> {
        let mut state = self.state.write().await;
        let stored = state.entry_mut(id)?;
        ensure_transition(stored.header.status, EntryStatus::Posted)?;

        let candidate = NewJournalEntry {
            entry_date: stored.header.entry_date,
            reference: stored.header.reference.clone(),
            description: stored.header.description.clone(),
            posted_by: posted_by.clone(),
            lines: stored
                .lines
                .iter()
                .map(|line| NewJournalLine {
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description.clone(),
                })
                .collect(),
        };
        validate_entry(&candidate)?;
        state.check_postable(&candidate)?;

        let stored = state.entry_mut(id)?;
        stored.header.status = EntryStatus::Posted;
        stored.header.posted_at = Some(Utc::now());
        stored.header.posted_by = posted_by;
        Ok(stored.header.clone())
    }

    /// Voids a draft or posted entry, removing it from every balance.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `InvalidStatusTransition` if already voided.
    pub async fn void_entry(&self, id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        let mut state = self.state.write().await;
        let stored = state.entry_mut(id)?;
        ensure_transition(stored.header.status, EntryStatus::Voided)?;
        stored.header.status = EntryStatus::Voided;
        Ok(stored.header.clone())
    }

    /// Fetches an entry and its lines.
    pub async fn entry(&self, id: JournalEntryId) -> Option<(JournalEntry, Vec<JournalEntryLine>)> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|entry| entry.header.id == id)
            .map(|entry| (entry.header.clone(), entry.lines.clone()))
    }
}

fn ensure_transition(from: EntryStatus, to: EntryStatus) -> Result<(), LedgerError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(LedgerError::InvalidStatusTransition { from, to })
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError> {
        let state = self.state.read().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|account| filter.matches(account))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn list_posted_lines(&self, filter: &LineFilter) -> Result<Vec<PostedLine>, StoreError> {
        let state = self.state.read().await;
        let mut lines: Vec<PostedLine> = state
            .entries
            .iter()
            .filter(|entry| entry.header.status == EntryStatus::Posted)
            .flat_map(|entry| {
                entry.lines.iter().map(move |line| PostedLine {
                    line_id: line.id,
                    entry_id: entry.header.id,
                    account_id: line.account_id,
                    entry_date: entry.header.entry_date,
                    reference: entry.header.reference.clone(),
                    entry_description: entry.header.description.clone(),
                    line_description: line.description.clone(),
                    debit: line.debit,
                    credit: line.credit,
                })
            })
            .filter(|line| filter.matches(line))
            .collect();
        // Stable: ties keep posting sequence, then line order.
        lines.sort_by_key(|line| line.entry_date);
        Ok(lines)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }
}
