//! Running balance ledgers.
//!
//! A [`RunningLedger`] owns an opening balance and the ordered lines of one
//! account for a period. [`RunningLedger::movements`] walks those lines and
//! yields the cumulative balance after each one. The walk keeps no state
//! between calls, so it can be restarted at will.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::types::{JournalEntryId, JournalLineId};

use super::account::Account;
use super::balance::{BalanceCalculator, BalanceTotals, sum_lines};
use super::classifier::NormalSide;
use super::entry::PostedLine;
use super::error::StoreError;
use super::store::{LedgerStore, LineFilter};
use crate::period::DateRange;

/// One line of an account ledger with the balance after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    /// Line ID.
    pub line_id: JournalLineId,
    /// Entry ID.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry reference.
    pub reference: String,
    /// Line description, or the entry description when the line has none.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this line, signed by the account's normal side.
    pub running_balance: Decimal,
}

/// An account's lines for a period, seeded with the balance before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningLedger {
    side: NormalSide,
    opening: Decimal,
    lines: Vec<PostedLine>,
}

impl RunningLedger {
    /// Creates a ledger from already ordered lines.
    #[must_use]
    pub fn new(side: NormalSide, opening: Decimal, lines: Vec<PostedLine>) -> Self {
        Self {
            side,
            opening,
            lines,
        }
    }

    /// Reads the opening balance and period lines of one account.
    ///
    /// The opening balance covers everything strictly before the range
    /// start, and is zero when the range has no start.
    pub async fn load(
        store: &dyn LedgerStore,
        account: &Account,
        range: DateRange,
    ) -> Result<Self, StoreError> {
        let opening = match range.preceding() {
            Some(before) => {
                BalanceCalculator::new(store)
                    .account_balance(account, before)
                    .await?
            }
            None => Decimal::ZERO,
        };
        let lines = store
            .list_posted_lines(&LineFilter::for_account(account.id, range))
            .await?;
        Ok(Self::new(NormalSide::of(account.account_type), opening, lines))
    }

    /// Balance before the first line.
    #[must_use]
    pub const fn opening_balance(&self) -> Decimal {
        self.opening
    }

    /// Normal side used for signing.
    #[must_use]
    pub const fn side(&self) -> NormalSide {
        self.side
    }

    /// Number of lines in the period.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the period has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Yields each line with its cumulative balance, in ledger order.
    pub fn movements(&self) -> impl Iterator<Item = Movement> + '_ {
        let side = self.side;
        self.lines.iter().scan(self.opening, move |balance, line| {
            *balance += side.signed_change(line.debit, line.credit);
            Some(Movement {
                line_id: line.line_id,
                entry_id: line.entry_id,
                date: line.entry_date,
                reference: line.reference.clone(),
                description: line.description().to_string(),
                debit: line.debit,
                credit: line.credit,
                running_balance: *balance,
            })
        })
    }

    /// Debit and credit sums of the period.
    #[must_use]
    pub fn period_totals(&self) -> BalanceTotals {
        sum_lines(&self.lines)
    }

    /// Balance after the last line.
    #[must_use]
    pub fn closing_balance(&self) -> Decimal {
        self.opening + self.period_totals().net(self.side)
    }
}
