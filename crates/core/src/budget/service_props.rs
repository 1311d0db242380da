//! Property-based tests for budget ledger arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::BudgetService;
use super::types::BudgetFigures;

/// Amounts in a realistic range, two decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000_00).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    /// remaining == allocated - spent after any set_allocation.
    #[test]
    fn prop_set_allocation_preserves_invariant(
        allocated in arb_amount(),
        spent in arb_amount(),
        new_allocated in arb_amount(),
    ) {
        let figures = BudgetFigures::new(allocated, spent);
        let updated = BudgetService::set_allocation(figures, new_allocated).unwrap();
        prop_assert_eq!(updated.remaining, updated.allocated - updated.spent);
        prop_assert_eq!(updated.spent, spent);
    }

    /// remaining == allocated - spent after any apply_expense, and the
    /// debit is exactly the amount.
    #[test]
    fn prop_apply_expense_preserves_invariant(
        allocated in arb_amount(),
        spent in arb_amount(),
        amount in arb_amount(),
    ) {
        let figures = BudgetFigures::new(allocated, spent);
        let updated = BudgetService::apply_expense(figures, amount).unwrap();
        prop_assert_eq!(updated.remaining, updated.allocated - updated.spent);
        prop_assert_eq!(updated.spent - spent, amount);
        prop_assert_eq!(updated.allocated, allocated);
    }

    /// A sequence of expenses debits the exact sum, in any order.
    #[test]
    fn prop_expenses_accumulate(amounts in prop::collection::vec(arb_amount(), 0..20)) {
        let mut figures = BudgetFigures::new(Decimal::new(1_000_000_00, 2), Decimal::ZERO);
        let mut expected = Decimal::ZERO;
        for amount in &amounts {
            figures = BudgetService::apply_expense(figures, *amount).unwrap();
            expected += *amount;
        }
        prop_assert_eq!(figures.spent, expected);
        prop_assert_eq!(figures.remaining, figures.allocated - expected);
    }

    /// Utilization is always finite and zero iff nothing allocated.
    #[test]
    fn prop_utilization_total(allocated in arb_amount(), spent in arb_amount()) {
        let pct = BudgetService::utilization_percent(allocated, spent);
        if allocated.is_zero() {
            prop_assert_eq!(pct, Decimal::ZERO);
        } else {
            prop_assert!(pct >= Decimal::ZERO);
        }
    }
}
