//! Balance sheet assembly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use neraca_shared::types::Materiality;

use super::types::{
    AccountBalance, BalanceSheetReport, BalanceSheetSection, BalanceSheetSubsection,
    StatementLine,
};
use crate::ledger::{AccountType, StatementBucket};

/// Builds a balance sheet from cumulative balances as of a date.
///
/// Unclosed current-year earnings are not patched in: if net income has not
/// been closed into equity the report comes out unbalanced.
#[must_use]
pub fn assemble_balance_sheet(
    as_of_date: NaiveDate,
    balances: Vec<AccountBalance>,
    materiality: Materiality,
) -> BalanceSheetReport {
    let mut assets = Vec::new();
    let mut liabilities = Vec::new();
    let mut equity = Vec::new();

    for balance in balances {
        if materiality.is_zero(balance.balance) {
            continue;
        }
        match balance.account_type {
            AccountType::Asset => assets.push(StatementLine::from(balance)),
            AccountType::Liability => liabilities.push(StatementLine::from(balance)),
            AccountType::Equity => equity.push(StatementLine::from(balance)),
            AccountType::Revenue | AccountType::CostOfSales | AccountType::Expense => {}
        }
    }

    let assets = section(
        assets,
        &[StatementBucket::CurrentAsset, StatementBucket::NonCurrentAsset],
    );
    let liabilities = section(
        liabilities,
        &[
            StatementBucket::CurrentLiability,
            StatementBucket::NonCurrentLiability,
        ],
    );
    let equity = section(equity, &[]);

    let total_assets = assets.total;
    let total_liabilities = liabilities.total;
    let total_equity = equity.total;
    let liabilities_and_equity = total_liabilities + total_equity;
    let current_assets = assets.subtotal(StatementBucket::CurrentAsset);
    let current_liabilities = liabilities.subtotal(StatementBucket::CurrentLiability);
    let difference = total_assets - liabilities_and_equity;
    let is_balanced = materiality.agrees(total_assets, liabilities_and_equity);

    if !is_balanced {
        warn!(
            %as_of_date,
            %total_assets,
            %liabilities_and_equity,
            %difference,
            "Balance sheet does not balance"
        );
    }

    BalanceSheetReport {
        as_of_date,
        non_current_assets: assets.subtotal(StatementBucket::NonCurrentAsset),
        non_current_liabilities: liabilities.subtotal(StatementBucket::NonCurrentLiability),
        assets,
        liabilities,
        equity,
        total_assets,
        total_liabilities,
        total_equity,
        liabilities_and_equity,
        current_assets,
        current_liabilities,
        working_capital: current_assets - current_liabilities,
        is_balanced,
        difference,
    }
}

fn section(lines: Vec<StatementLine>, buckets: &[StatementBucket]) -> BalanceSheetSection {
    let subsections = buckets
        .iter()
        .map(|bucket| {
            let accounts: Vec<StatementLine> = lines
                .iter()
                .filter(|line| line.bucket == *bucket)
                .cloned()
                .collect();
            BalanceSheetSubsection {
                bucket: *bucket,
                name: bucket.label().to_string(),
                total: accounts.iter().map(|line| line.amount).sum(),
                accounts,
            }
        })
        .collect();

    BalanceSheetSection {
        total: lines.iter().map(|line| line.amount).sum(),
        accounts: lines,
        subsections,
    }
}
