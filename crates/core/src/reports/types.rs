//! Report output shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::BudgetFigures;

/// A single department or project row in a budget report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub figures: BudgetFigures,
    pub utilization_percent: Decimal,
}

/// Institution-wide budget summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Combined department and project figures.
    pub totals: BudgetFigures,
    pub utilization_percent: Decimal,
    pub department_count: usize,
    pub departments: Vec<BudgetLine>,
    pub projects: Vec<BudgetLine>,
}

/// One category in the expense breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: i64,
}

/// Spending total for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
}

impl MonthlyBucket {
    #[must_use]
    pub const fn new(year: i32, month: u32, total: Decimal) -> Self {
        Self { year, month, total }
    }

    /// Sort key: months in chronological order.
    #[must_use]
    pub const fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64
    }
}
