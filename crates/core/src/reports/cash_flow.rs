//! Cash flow statement assembly (indirect method, simplified).
//!
//! Operating cash flow is net income with no adjustments: depreciation is
//! not added back and working capital changes are ignored. Investing and
//! financing lines come from account code groups. A fixed asset that grows
//! by a debit is cash spent; a loan or share capital that grows by a credit
//! is cash received.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use neraca_shared::types::Materiality;

use super::types::{AccountBalance, CashFlowItem, CashFlowReport, CashFlowSection};
use crate::ledger::{AccountClassifier, CashFlowActivity};

/// Builds the cash flow statement.
///
/// `period_balances` are movements over the period for the accounts to
/// consider; accounts outside the investing and financing groups are ignored.
#[must_use]
pub fn assemble_cash_flow(
    start_date: NaiveDate,
    end_date: NaiveDate,
    net_income: Decimal,
    period_balances: Vec<AccountBalance>,
    classifier: &AccountClassifier,
    materiality: Materiality,
) -> CashFlowReport {
    let mut operating = CashFlowSection::default();
    operating.push(CashFlowItem {
        account_id: None,
        code: None,
        label: "Net income".to_string(),
        amount: net_income,
    });

    let mut investing = CashFlowSection::default();
    let mut financing = CashFlowSection::default();

    for balance in period_balances {
        let Some(activity) = classifier.cash_flow_activity(&balance.code) else {
            continue;
        };
        let amount = balance.normal_side().cash_effect(balance.balance);
        if materiality.is_zero(amount) {
            continue;
        }
        let item = CashFlowItem {
            account_id: Some(balance.account_id),
            code: Some(balance.code),
            label: balance.name,
            amount,
        };
        match activity {
            CashFlowActivity::Investing => investing.push(item),
            CashFlowActivity::Financing => financing.push(item),
        }
    }

    let net_cash_flow = operating.total + investing.total + financing.total;

    CashFlowReport {
        start_date,
        end_date,
        operating,
        investing,
        financing,
        net_cash_flow,
    }
}
