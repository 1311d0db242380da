//! Role/institution-scoped authorization policy.
//!
//! Every mutating operation in the system consults this one policy before
//! touching the store. The rules live in a single grants table instead of
//! per-route conditionals.
//!
//! # Modules
//!
//! - `types` - Actor, action, resource context, and the closed role enum
//! - `policy` - The table-driven decision function

pub mod policy;
pub mod types;

#[cfg(test)]
mod policy_props;

pub use policy::{PolicyError, authorize, can_act};
pub use types::{Action, Actor, ResourceCtx, ResourceKind, UserRole};
