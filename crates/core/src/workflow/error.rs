//! Workflow error types.

use thiserror::Error;

use crate::workflow::types::TransactionStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: TransactionStatus,
        /// The attempted target status.
        to: TransactionStatus,
    },

    /// Attempted to modify a transaction past its editable state.
    #[error("cannot modify a transaction in status {0}")]
    NotEditable(TransactionStatus),

    /// Attempted to delete a transaction past its deletable state.
    #[error("cannot delete a transaction in status {0}")]
    NotDeletable(TransactionStatus),

    /// A create-input field failed validation.
    #[error("{field}: {message}")]
    Validation {
        /// The field at fault.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Referenced department/project belongs to a different institution.
    #[error("cross-institution reference: {resource} does not belong to this institution")]
    CrossInstitution {
        /// The offending reference ("department" or "project").
        resource: &'static str,
    },
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } | Self::NotEditable(_) | Self::NotDeletable(_) => 409,
            Self::Validation { .. } | Self::CrossInstitution { .. } => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } | Self::NotEditable(_) | Self::NotDeletable(_) => {
                "INVALID_STATE"
            }
            Self::Validation { .. } | Self::CrossInstitution { .. } => "VALIDATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_errors_map_to_conflict() {
        let err = WorkflowError::InvalidTransition {
            from: TransactionStatus::Approved,
            to: TransactionStatus::Approved,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_STATE");

        let err = WorkflowError::NotEditable(TransactionStatus::Completed);
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("completed"));
    }

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let err = WorkflowError::Validation {
            field: "amount",
            message: "must be non-negative".into(),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().starts_with("amount:"));

        let err = WorkflowError::CrossInstitution {
            resource: "department",
        };
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("cross-institution"));
    }
}
