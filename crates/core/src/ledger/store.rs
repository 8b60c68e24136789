//! The ledger store seam.
//!
//! Reports only ever read through [`LedgerStore`]. Backends decide how to
//! persist accounts and entries; they must return posted lines in a stable
//! order: entry date, then entry posting sequence, then line sequence.

use std::collections::BTreeSet;

use async_trait::async_trait;

use neraca_shared::types::AccountId;

use super::account::{Account, AccountType};
use super::entry::PostedLine;
use super::error::StoreError;
use crate::period::DateRange;

/// Read access to accounts and posted journal lines.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Lists accounts matching the filter, ordered by code.
    async fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError>;

    /// Lists lines of posted entries matching the filter, in ledger order.
    async fn list_posted_lines(&self, filter: &LineFilter) -> Result<Vec<PostedLine>, StoreError>;

    /// Fetches one account. `Ok(None)` when it does not exist.
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;
}

/// Account selection for [`LedgerStore::list_accounts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    /// Restrict to these types. `None` means all types.
    pub types: Option<Vec<AccountType>>,
    /// Only active accounts.
    pub active_only: bool,
}

impl AccountFilter {
    /// All accounts.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Active accounts of any type.
    #[must_use]
    pub fn active() -> Self {
        Self {
            types: None,
            active_only: true,
        }
    }

    /// Restricts to the given types.
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = AccountType>) -> Self {
        self.types = Some(types.into_iter().collect());
        self
    }

    /// Returns true if the account passes the filter.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        if self.active_only && !account.is_active {
            return false;
        }
        self.types
            .as_ref()
            .is_none_or(|types| types.contains(&account.account_type))
    }
}

/// Line selection for [`LedgerStore::list_posted_lines`].
///
/// `account_id` and `account_ids` combine with AND when both are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFilter {
    /// Single account.
    pub account_id: Option<AccountId>,
    /// Account set.
    pub account_ids: Option<BTreeSet<AccountId>>,
    /// Entry date window.
    pub range: DateRange,
}

impl LineFilter {
    /// All posted lines in the range.
    #[must_use]
    pub fn all(range: DateRange) -> Self {
        Self {
            account_id: None,
            account_ids: None,
            range,
        }
    }

    /// Lines of one account in the range.
    #[must_use]
    pub fn for_account(account_id: AccountId, range: DateRange) -> Self {
        Self {
            account_id: Some(account_id),
            account_ids: None,
            range,
        }
    }

    /// Lines of any of the accounts in the range.
    #[must_use]
    pub fn for_accounts(
        account_ids: impl IntoIterator<Item = AccountId>,
        range: DateRange,
    ) -> Self {
        Self {
            account_id: None,
            account_ids: Some(account_ids.into_iter().collect()),
            range,
        }
    }

    /// Returns true if the line passes the filter.
    #[must_use]
    pub fn matches(&self, line: &PostedLine) -> bool {
        self.account_id.is_none_or(|id| id == line.account_id)
            && self
                .account_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&line.account_id))
            && self.range.includes(line.entry_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use neraca_shared::types::{JournalEntryId, JournalLineId};
    use rust_decimal::Decimal;

    fn line(account_id: AccountId, date: NaiveDate) -> PostedLine {
        PostedLine {
            line_id: JournalLineId::new(),
            entry_id: JournalEntryId::new(),
            account_id,
            entry_date: date,
            reference: "JE-1".into(),
            entry_description: "Test".into(),
            line_description: None,
            debit: Decimal::ONE,
            credit: Decimal::ZERO,
        }
    }

    #[test]
    fn test_account_filter() {
        let mut cash = Account::new("1100", "Cash", AccountType::Asset);
        let revenue = Account::new("4000", "Sales", AccountType::Revenue);

        assert!(AccountFilter::all().matches(&cash));
        assert!(AccountFilter::active().with_types([AccountType::Asset]).matches(&cash));
        assert!(!AccountFilter::active().with_types([AccountType::Asset]).matches(&revenue));

        cash.is_active = false;
        assert!(!AccountFilter::active().matches(&cash));
        assert!(AccountFilter::all().matches(&cash));
    }

    #[test]
    fn test_line_filter() {
        let a = AccountId::new();
        let b = AccountId::new();
        let jan_10 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let range = DateRange::as_of(jan_10);

        assert!(LineFilter::all(range).matches(&line(a, jan_10)));
        assert!(LineFilter::for_account(a, range).matches(&line(a, jan_10)));
        assert!(!LineFilter::for_account(a, range).matches(&line(b, jan_10)));
        assert!(LineFilter::for_accounts([a, b], range).matches(&line(b, jan_10)));
        assert!(!LineFilter::for_accounts([a], range).matches(&line(b, jan_10)));
        assert!(!LineFilter::all(DateRange::before(jan_10)).matches(&line(a, jan_10)));
    }
}
