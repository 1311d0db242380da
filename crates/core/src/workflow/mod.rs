//! Transaction approval workflow.
//!
//! Implements the transaction lifecycle state machine
//! (pending → approved | rejected; completed is terminal) and the input
//! validation that gates transaction creation.
//!
//! # Modules
//!
//! - `types` - Status/type enums and the transition audit record
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic and create validation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::{TransactionDraft, WorkflowService};
pub use types::{RecurringFrequency, TransactionStatus, TransactionType, WorkflowAction};
