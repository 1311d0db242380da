//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The budget figures carried by every department and project.
///
/// Invariant: `remaining == allocated - spent`, recomputed on every
/// write and never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetFigures {
    /// Total allocated amount.
    pub allocated: Decimal,
    /// Total spent amount.
    pub spent: Decimal,
    /// Remaining amount (`allocated - spent`).
    pub remaining: Decimal,
}

impl BudgetFigures {
    /// Creates figures from allocated/spent, deriving `remaining`.
    #[must_use]
    pub fn new(allocated: Decimal, spent: Decimal) -> Self {
        Self {
            allocated,
            spent,
            remaining: allocated - spent,
        }
    }

    /// Figures with nothing allocated or spent.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }
}

impl Default for BudgetFigures {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_remaining_derived_on_construction() {
        let figures = BudgetFigures::new(dec!(100_000), dec!(25_000));
        assert_eq!(figures.remaining, dec!(75_000));
    }

    #[test]
    fn test_zero_figures() {
        let figures = BudgetFigures::zero();
        assert_eq!(figures.allocated, Decimal::ZERO);
        assert_eq!(figures.spent, Decimal::ZERO);
        assert_eq!(figures.remaining, Decimal::ZERO);
    }
}
