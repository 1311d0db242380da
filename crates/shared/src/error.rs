//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// One variant per failure class the API can surface. Store failures are
/// logged internally and never carry persistence details to callers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, invalid, or expired credential; or inactive user.
    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    /// Authenticated actor failed the authorization policy.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Malformed input; the message names the field at fault.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced ID does not resolve.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not legal for the entity's current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Conflict (e.g., duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying persistence failure; opaque to callers.
    #[error("Store error: {0}")]
    Store(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::InvalidState(_) | Self::Conflict(_) => 409,
            Self::Store(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "AUTHENTICATION_ERROR",
            Self::Forbidden(_) => "AUTHORIZATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message safe to show API callers.
    ///
    /// Store and internal errors are masked; everything else carries
    /// enough detail to act on.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthenticated(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::InvalidState(String::new()).status_code(), 409);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Store(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Unauthenticated(String::new()).error_code(),
            "AUTHENTICATION_ERROR"
        );
        assert_eq!(
            AppError::Forbidden(String::new()).error_code(),
            "AUTHORIZATION_ERROR"
        );
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::InvalidState(String::new()).error_code(),
            "INVALID_STATE"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(AppError::Store(String::new()).error_code(), "STORE_ERROR");
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_store_errors_are_masked() {
        let err = AppError::Store("connection reset by peer".into());
        assert_eq!(err.public_message(), "An internal error occurred");

        let err = AppError::Validation("amount must be non-negative".into());
        assert_eq!(
            err.public_message(),
            "Validation error: amount must be non-negative"
        );
    }
}
