//! Trial balance assembly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use neraca_shared::types::Materiality;

use super::types::{AccountBalance, TrialBalanceLine, TrialBalanceReport};

/// Builds a trial balance from per-account balances as of a date.
///
/// Accounts are included when either column is material. An imbalance is
/// reported through `is_balanced` and `difference`, never as an error.
#[must_use]
pub fn assemble_trial_balance(
    as_of_date: NaiveDate,
    balances: Vec<AccountBalance>,
    materiality: Materiality,
) -> TrialBalanceReport {
    let accounts: Vec<TrialBalanceLine> = balances
        .into_iter()
        .filter_map(|balance| {
            let columns = balance.debit_credit();
            (materiality.is_material(columns.debit) || materiality.is_material(columns.credit))
                .then(|| TrialBalanceLine {
                    account_id: balance.account_id,
                    code: balance.code,
                    name: balance.name,
                    account_type: balance.account_type,
                    debit: columns.debit,
                    credit: columns.credit,
                })
        })
        .collect();

    let total_debit: Decimal = accounts.iter().map(|line| line.debit).sum();
    let total_credit: Decimal = accounts.iter().map(|line| line.credit).sum();
    let difference = total_debit - total_credit;
    let is_balanced = materiality.agrees(total_debit, total_credit);

    if !is_balanced {
        warn!(
            %as_of_date,
            %total_debit,
            %total_credit,
            %difference,
            "Trial balance does not balance"
        );
    }

    TrialBalanceReport {
        as_of_date,
        accounts,
        total_debit,
        total_credit,
        is_balanced,
        difference,
    }
}
