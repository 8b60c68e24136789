//! Account ledgers with running balances.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use neraca_shared::types::AccountId;

use super::types::{AccountLedger, GeneralLedgerReport};
use crate::ledger::{Account, BalanceTotals, NormalSide, PostedLine, RunningLedger};
use crate::period::DateRange;

/// Shapes a running ledger into its report block.
#[must_use]
pub fn account_ledger(
    account: &Account,
    range: DateRange,
    running: &RunningLedger,
) -> AccountLedger {
    let totals = running.period_totals();
    AccountLedger {
        account_id: account.id,
        code: account.code.clone(),
        name: account.name.clone(),
        account_type: account.account_type,
        normal_side: running.side(),
        start_date: range.start_date(),
        end_date: range.end_date(),
        beginning_balance: running.opening_balance(),
        movements: running.movements().collect(),
        total_debit: totals.debit,
        total_credit: totals.credit,
        ending_balance: running.closing_balance(),
    }
}

/// Groups period lines by account into ledgers, each seeded with its own
/// opening balance.
///
/// Only accounts with lines in `lines` appear. Accounts missing from
/// `accounts` are skipped. Blocks are ordered by account code.
#[must_use]
pub fn group_ledgers(
    accounts: &[Account],
    lines: Vec<PostedLine>,
    openings: &HashMap<AccountId, BalanceTotals>,
    range: DateRange,
) -> Vec<AccountLedger> {
    let mut grouped: HashMap<AccountId, Vec<PostedLine>> = HashMap::new();
    for line in lines {
        grouped.entry(line.account_id).or_default().push(line);
    }

    let mut ledgers: Vec<AccountLedger> = accounts
        .iter()
        .filter_map(|account| {
            let lines = grouped.remove(&account.id)?;
            let side = NormalSide::of(account.account_type);
            let opening = openings
                .get(&account.id)
                .map_or(Decimal::ZERO, |totals| totals.net(side));
            let running = RunningLedger::new(side, opening, lines);
            Some(account_ledger(account, range, &running))
        })
        .collect();
    ledgers.sort_by(|a, b| a.code.cmp(&b.code));
    ledgers
}

/// Wraps ledger blocks into the general ledger report.
#[must_use]
pub fn general_ledger_report(
    start_date: NaiveDate,
    end_date: NaiveDate,
    accounts: Vec<AccountLedger>,
) -> GeneralLedgerReport {
    let total_debit = accounts.iter().map(|ledger| ledger.total_debit).sum();
    let total_credit = accounts.iter().map(|ledger| ledger.total_credit).sum();
    GeneralLedgerReport {
        start_date,
        end_date,
        accounts,
        total_debit,
        total_credit,
    }
}
