//! Account balance calculations.
//!
//! A balance is the sum of posted debit and credit magnitudes over a date
//! range, signed by the account's normal side: positive means the account
//! sits on its expected side.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::types::AccountId;

use super::account::Account;
use super::classifier::NormalSide;
use super::entry::PostedLine;
use super::error::StoreError;
use super::store::{LedgerStore, LineFilter};
use crate::period::DateRange;

/// Raw debit and credit sums for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl BalanceTotals {
    /// Adds one line's amounts.
    pub fn add_line(&mut self, line: &PostedLine) {
        self.debit += line.debit;
        self.credit += line.credit;
    }

    /// Signed net balance for the given normal side.
    #[must_use]
    pub fn net(&self, side: NormalSide) -> Decimal {
        side.signed_change(self.debit, self.credit)
    }
}

/// A net balance split into a single non-negative debit or credit figure.
///
/// At most one side is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitCreditBalance {
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

impl DebitCreditBalance {
    /// Splits a signed net balance onto the debit or credit column.
    #[must_use]
    pub fn from_net(side: NormalSide, net: Decimal) -> Self {
        let positive = net.max(Decimal::ZERO);
        let negative = (-net).max(Decimal::ZERO);
        match side {
            NormalSide::Debit => Self {
                debit: positive,
                credit: negative,
            },
            NormalSide::Credit => Self {
                debit: negative,
                credit: positive,
            },
        }
    }

    /// Signed net balance for the given normal side.
    #[must_use]
    pub fn net(&self, side: NormalSide) -> Decimal {
        side.signed_change(self.debit, self.credit)
    }

    /// Returns true if both columns are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }
}

/// Computes balances by reading posted lines from a [`LedgerStore`].
#[derive(Clone, Copy)]
pub struct BalanceCalculator<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> BalanceCalculator<'a> {
    /// Creates a calculator over a store.
    #[must_use]
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// Raw debit/credit sums for one account in the range.
    pub async fn totals(
        &self,
        account_id: AccountId,
        range: DateRange,
    ) -> Result<BalanceTotals, StoreError> {
        let lines = self
            .store
            .list_posted_lines(&LineFilter::for_account(account_id, range))
            .await?;
        Ok(sum_lines(&lines))
    }

    /// Signed balance of an account over the range. Zero when no lines match.
    pub async fn account_balance(
        &self,
        account: &Account,
        range: DateRange,
    ) -> Result<Decimal, StoreError> {
        let totals = self.totals(account.id, range).await?;
        Ok(totals.net(NormalSide::of(account.account_type)))
    }

    /// Balance as of a date, split onto one column.
    pub async fn account_debit_credit_balance(
        &self,
        account: &Account,
        as_of: NaiveDate,
    ) -> Result<DebitCreditBalance, StoreError> {
        let side = NormalSide::of(account.account_type);
        let net = self.account_balance(account, DateRange::as_of(as_of)).await?;
        Ok(DebitCreditBalance::from_net(side, net))
    }

    /// Totals for many accounts from a single store read.
    ///
    /// Accounts without lines in the range are absent from the map.
    pub async fn totals_by_account(
        &self,
        account_ids: impl IntoIterator<Item = AccountId>,
        range: DateRange,
    ) -> Result<HashMap<AccountId, BalanceTotals>, StoreError> {
        let lines = self
            .store
            .list_posted_lines(&LineFilter::for_accounts(account_ids, range))
            .await?;
        Ok(group_totals(&lines))
    }
}

/// Sums a set of lines.
#[must_use]
pub fn sum_lines(lines: &[PostedLine]) -> BalanceTotals {
    lines.iter().fold(BalanceTotals::default(), |mut totals, line| {
        totals.add_line(line);
        totals
    })
}

/// Sums lines per account.
#[must_use]
pub fn group_totals(lines: &[PostedLine]) -> HashMap<AccountId, BalanceTotals> {
    let mut totals: HashMap<AccountId, BalanceTotals> = HashMap::new();
    for line in lines {
        totals.entry(line.account_id).or_default().add_line(line);
    }
    totals
}
