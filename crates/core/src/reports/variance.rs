//! Period-over-period variance.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::types::ProfitAndLossReport;
use crate::period::ReportPeriod;

/// Change between two amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variance {
    /// Current period amount.
    pub current: Decimal,
    /// Previous period amount.
    pub previous: Decimal,
    /// `current - previous`.
    pub change: Decimal,
    /// `change / |previous| * 100`, rounded to 2 places; 0 when previous is 0.
    pub change_percent: Decimal,
}

impl Variance {
    /// Computes the variance between two amounts.
    #[must_use]
    pub fn between(current: Decimal, previous: Decimal) -> Self {
        let change = current - previous;
        let change_percent = if previous.is_zero() {
            Decimal::ZERO
        } else {
            change
                .checked_div(previous.abs())
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Decimal::ZERO, |percent| {
                    percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                })
        };
        Self {
            current,
            previous,
            change,
            change_percent,
        }
    }
}

/// Profit and loss totals compared across two periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAndLossVariance {
    /// Current period.
    pub current_period: ReportPeriod,
    /// Previous period.
    pub previous_period: ReportPeriod,
    /// Total revenue.
    pub revenue: Variance,
    /// Total cost of sales.
    pub cost_of_sales: Variance,
    /// Total operating expenses.
    pub operating_expenses: Variance,
    /// Gross profit.
    pub gross_profit: Variance,
    /// Operating income.
    pub operating_income: Variance,
    /// Net income.
    pub net_income: Variance,
}

impl ProfitAndLossVariance {
    /// Compares two profit and loss reports.
    #[must_use]
    pub fn compare(
        current_period: ReportPeriod,
        current: &ProfitAndLossReport,
        previous_period: ReportPeriod,
        previous: &ProfitAndLossReport,
    ) -> Self {
        Self {
            current_period,
            previous_period,
            revenue: Variance::between(current.total_revenue, previous.total_revenue),
            cost_of_sales: Variance::between(
                current.total_cost_of_sales,
                previous.total_cost_of_sales,
            ),
            operating_expenses: Variance::between(
                current.total_operating_expenses,
                previous.total_operating_expenses,
            ),
            gross_profit: Variance::between(current.gross_profit, previous.gross_profit),
            operating_income: Variance::between(
                current.operating_income,
                previous.operating_income,
            ),
            net_income: Variance::between(current.net_income, previous.net_income),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(150), dec!(100), dec!(50), dec!(50))]
    #[case(dec!(50), dec!(100), dec!(-50), dec!(-50))]
    #[case(dec!(100), dec!(0), dec!(100), dec!(0))]
    #[case(dec!(-50), dec!(-100), dec!(50), dec!(50))]
    #[case(dec!(1), dec!(3), dec!(-2), dec!(-66.67))]
    fn test_variance(
        #[case] current: Decimal,
        #[case] previous: Decimal,
        #[case] change: Decimal,
        #[case] percent: Decimal,
    ) {
        let variance = Variance::between(current, previous);
        assert_eq!(variance.change, change);
        assert_eq!(variance.change_percent, percent);
    }
}
