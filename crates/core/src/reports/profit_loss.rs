//! Profit and loss assembly.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use neraca_shared::types::Materiality;

use super::types::{AccountBalance, ProfitAndLossReport, ProfitAndLossSection, StatementLine};
use crate::ledger::AccountType;

/// Builds a profit and loss statement from balances over a bounded period.
///
/// Item amounts are balances on the account's normal side, so revenue and
/// expenses both read positive. A contra balance shows negative and reduces
/// its section.
#[must_use]
pub fn assemble_profit_and_loss(
    start_date: NaiveDate,
    end_date: NaiveDate,
    balances: Vec<AccountBalance>,
    materiality: Materiality,
) -> ProfitAndLossReport {
    let mut revenue = ProfitAndLossSection::default();
    let mut cost_of_sales = ProfitAndLossSection::default();
    let mut operating_expenses = ProfitAndLossSection::default();

    for balance in balances {
        if materiality.is_zero(balance.balance) {
            continue;
        }
        let target = match balance.account_type {
            AccountType::Revenue => &mut revenue,
            AccountType::CostOfSales => &mut cost_of_sales,
            AccountType::Expense => &mut operating_expenses,
            AccountType::Asset | AccountType::Liability | AccountType::Equity => continue,
        };
        target.total += balance.balance;
        target.accounts.push(StatementLine::from(balance));
    }

    let total_revenue = revenue.total;
    let gross_profit = total_revenue - cost_of_sales.total;
    let operating_income = gross_profit - operating_expenses.total;
    let net_income = operating_income;

    ProfitAndLossReport {
        start_date,
        end_date,
        total_revenue,
        total_cost_of_sales: cost_of_sales.total,
        total_operating_expenses: operating_expenses.total,
        gross_margin: margin(gross_profit, total_revenue),
        net_margin: margin(net_income, total_revenue),
        revenue,
        cost_of_sales,
        operating_expenses,
        gross_profit,
        operating_income,
        net_income,
    }
}

/// `amount / revenue * 100`, rounded to 2 places; 0 when revenue is not positive.
#[must_use]
pub fn margin(amount: Decimal, revenue: Decimal) -> Decimal {
    if revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount
        .checked_div(revenue)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ZERO, |percent| {
            percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        })
}
