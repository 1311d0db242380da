//! Budget ledger operations.

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::BudgetFigures;

/// Stateless service for budget figure arithmetic.
pub struct BudgetService;

impl BudgetService {
    /// Replaces the allocation, recomputing `remaining = allocated - spent`.
    ///
    /// `spent` is never touched here; it only moves through
    /// [`BudgetService::apply_expense`].
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAllocation` if `allocated` is negative.
    pub fn set_allocation(
        figures: BudgetFigures,
        allocated: Decimal,
    ) -> Result<BudgetFigures, BudgetError> {
        if allocated < Decimal::ZERO {
            return Err(BudgetError::NegativeAllocation(allocated));
        }
        Ok(BudgetFigures::new(allocated, figures.spent))
    }

    /// Debits an expense: `spent += amount`, recomputing `remaining`.
    ///
    /// Called exactly once per expense transaction, at creation time.
    /// Status transitions never pass through here.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` if `amount` is negative.
    pub fn apply_expense(
        figures: BudgetFigures,
        amount: Decimal,
    ) -> Result<BudgetFigures, BudgetError> {
        if amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount(amount));
        }
        Ok(BudgetFigures::new(
            figures.allocated,
            figures.spent + amount,
        ))
    }

    /// Utilization as a percentage, rounded to two decimal places.
    ///
    /// Zero when nothing is allocated; never divides by zero.
    #[must_use]
    pub fn utilization_percent(allocated: Decimal, spent: Decimal) -> Decimal {
        if allocated.is_zero() {
            Decimal::ZERO
        } else {
            (spent / allocated * Decimal::ONE_HUNDRED).round_dp(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_set_allocation_recomputes_remaining() {
        let figures = BudgetFigures::new(dec!(100_000), dec!(30_000));
        let updated = BudgetService::set_allocation(figures, dec!(150_000)).unwrap();

        assert_eq!(updated.allocated, dec!(150_000));
        assert_eq!(updated.spent, dec!(30_000));
        assert_eq!(updated.remaining, dec!(120_000));
    }

    #[test]
    fn test_set_allocation_rejects_negative() {
        let figures = BudgetFigures::zero();
        assert!(matches!(
            BudgetService::set_allocation(figures, dec!(-1)),
            Err(BudgetError::NegativeAllocation(_))
        ));
    }

    #[test]
    fn test_apply_expense_debits_spent() {
        let figures = BudgetFigures::new(dec!(100_000), Decimal::ZERO);
        let updated = BudgetService::apply_expense(figures, dec!(10_000)).unwrap();

        assert_eq!(updated.spent, dec!(10_000));
        assert_eq!(updated.remaining, dec!(90_000));
    }

    #[test]
    fn test_apply_expense_rejects_negative() {
        let figures = BudgetFigures::zero();
        assert!(matches!(
            BudgetService::apply_expense(figures, dec!(-5)),
            Err(BudgetError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_overspend_yields_negative_remaining() {
        let figures = BudgetFigures::new(dec!(1_000), dec!(900));
        let updated = BudgetService::apply_expense(figures, dec!(500)).unwrap();
        assert_eq!(updated.remaining, dec!(-400));
    }

    #[test]
    fn test_utilization_percent() {
        assert_eq!(
            BudgetService::utilization_percent(dec!(300_000), dec!(150_000)),
            dec!(50.00)
        );
        assert_eq!(
            BudgetService::utilization_percent(dec!(3), dec!(1)),
            dec!(33.33)
        );
    }

    #[test]
    fn test_utilization_zero_allocation() {
        assert_eq!(
            BudgetService::utilization_percent(Decimal::ZERO, dec!(500)),
            Decimal::ZERO
        );
    }
}
