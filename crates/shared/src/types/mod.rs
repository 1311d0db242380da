//! Common types used across the application.

pub mod currency;
pub mod pagination;

pub use currency::Currency;
pub use pagination::{PageMeta, PageRequest, PageResponse};
