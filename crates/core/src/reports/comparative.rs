//! Merging per-period trial balances into one comparative table.

use std::collections::BTreeMap;

use neraca_shared::types::AccountId;

use super::types::{
    ComparativeTrialBalance, ComparativeTrialBalanceRow, PeriodResult, TrialBalanceReport,
};
use crate::ledger::DebitCreditBalance;

/// Pairs each period's trial balance with a merged account table.
///
/// The table is the union of accounts appearing in any period, ordered by
/// code. An account missing from a period gets a zero column there.
#[must_use]
pub fn merge_trial_balances(
    periods: Vec<PeriodResult<TrialBalanceReport>>,
) -> ComparativeTrialBalance {
    let column_count = periods.len();
    let mut rows: BTreeMap<(String, AccountId), ComparativeTrialBalanceRow> = BTreeMap::new();

    for (index, result) in periods.iter().enumerate() {
        for line in &result.report.accounts {
            let row = rows
                .entry((line.code.clone(), line.account_id))
                .or_insert_with(|| ComparativeTrialBalanceRow {
                    account_id: line.account_id,
                    code: line.code.clone(),
                    name: line.name.clone(),
                    account_type: line.account_type,
                    columns: vec![DebitCreditBalance::default(); column_count],
                });
            row.columns[index] = DebitCreditBalance {
                debit: line.debit,
                credit: line.credit,
            };
        }
    }

    ComparativeTrialBalance {
        periods,
        accounts: rows.into_values().collect(),
    }
}
