//! Core business logic for Fiscora.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, decision rules, and calculations live here.
//!
//! # Modules
//!
//! - `authz` - Role/institution-scoped authorization policy
//! - `budget` - Budget ledger math (allocated/spent/remaining, utilization)
//! - `workflow` - Transaction approval lifecycle state machine
//! - `reports` - Read-only aggregate calculators for dashboards
//! - `auth` - Password hashing

pub mod auth;
pub mod authz;
pub mod budget;
pub mod reports;
pub mod workflow;
