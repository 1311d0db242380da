//! Budget ledger math.
//!
//! Keeps `allocated/spent/remaining` consistent for departments and
//! projects and computes utilization. The store layer applies the same
//! arithmetic as atomic column updates; this module is the single
//! definition of what the figures mean.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::BudgetFigures;
