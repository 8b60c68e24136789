//! Decimal amount helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this module only decides
//! when an amount is small enough to be reported as zero.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Threshold below which an amount is treated as zero for reporting.
///
/// Internal sums keep full precision. The tolerance is only applied when
/// deciding whether to include a balance in a statement or whether two
/// totals agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materiality {
    /// Smallest absolute amount that is considered material.
    pub tolerance: Decimal,
}

impl Materiality {
    /// Creates a materiality rule with the given tolerance.
    ///
    /// Negative tolerances are taken by absolute value.
    #[must_use]
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// Returns true if the amount should be reported.
    #[must_use]
    pub fn is_material(&self, amount: Decimal) -> bool {
        amount.abs() >= self.tolerance
    }

    /// Returns true if the amount is treated as zero.
    #[must_use]
    pub fn is_zero(&self, amount: Decimal) -> bool {
        !self.is_material(amount)
    }

    /// Returns true if two amounts agree within the tolerance.
    #[must_use]
    pub fn agrees(&self, left: Decimal, right: Decimal) -> bool {
        self.is_zero(left - right)
    }
}

impl Default for Materiality {
    fn default() -> Self {
        Self::new(Decimal::new(1, 2))
    }
}

/// Formats an amount for display with exactly two decimal places.
///
/// Rounds half away from zero. Only for presentation; never feed the
/// result back into calculations.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
