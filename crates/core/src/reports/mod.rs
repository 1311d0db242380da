//! Reporting calculators.
//!
//! Pure aggregation over rows the store layer has already fetched or
//! grouped. Deterministic; empty input yields zero/empty output.

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{BudgetLine, BudgetSummary, CategoryTotal, MonthlyBucket};
