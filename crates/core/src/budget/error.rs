//! Budget error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Allocation must be a non-negative amount.
    #[error("allocation must be non-negative, got {0}")]
    NegativeAllocation(Decimal),

    /// Expense amounts must be non-negative.
    #[error("expense amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),
}

impl BudgetError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "VALIDATION_ERROR"
    }
}
