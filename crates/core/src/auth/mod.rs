//! Credential handling.
//!
//! Password hashing and verification with Argon2id. Role definitions
//! live in [`crate::authz`].

mod password;

pub use password::{PasswordError, hash_password, verify_password};
