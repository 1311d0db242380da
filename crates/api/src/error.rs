//! Error-to-response mapping.
//!
//! Domain errors from `fiscora-core` and the repositories convert into
//! [`AppError`] here; handlers return `Result<_, ApiError>` and propagate
//! with `?`. The response body is always `{ "error": CODE, "message": text }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use fiscora_core::auth::PasswordError;
use fiscora_core::authz::PolicyError;
use fiscora_core::budget::BudgetError;
use fiscora_core::workflow::WorkflowError;
use fiscora_db::repositories::{
    DepartmentError, InstitutionError, ProjectError, ReportError, TransactionError, UserError,
};
use fiscora_shared::{AppError, JwtError};

/// API-boundary error. Wraps [`AppError`] and renders it.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }

        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Unauthenticated(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        Self(AppError::Forbidden(err.to_string()))
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let app = match &err {
            WorkflowError::Validation { .. } | WorkflowError::CrossInstitution { .. } => {
                AppError::Validation(err.to_string())
            }
            _ => AppError::InvalidState(err.to_string()),
        };
        Self(app)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let app = match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::DuplicateEmail => AppError::Conflict(err.to_string()),
            UserError::Database(_) => AppError::Store(err.to_string()),
        };
        Self(app)
    }
}

impl From<InstitutionError> for ApiError {
    fn from(err: InstitutionError) -> Self {
        let app = match err {
            InstitutionError::NotFound(_) => AppError::NotFound(err.to_string()),
            InstitutionError::DuplicateName => AppError::Conflict(err.to_string()),
            InstitutionError::Database(_) => AppError::Store(err.to_string()),
        };
        Self(app)
    }
}

impl From<DepartmentError> for ApiError {
    fn from(err: DepartmentError) -> Self {
        let app = match err {
            DepartmentError::NotFound(_) | DepartmentError::InstitutionNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            DepartmentError::DuplicateName => AppError::Conflict(err.to_string()),
            DepartmentError::HasTransactions(_) => AppError::InvalidState(err.to_string()),
            DepartmentError::Database(_) => AppError::Store(err.to_string()),
        };
        Self(app)
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        let app = match err {
            ProjectError::NotFound(_)
            | ProjectError::InstitutionNotFound(_)
            | ProjectError::DepartmentNotFound(_) => AppError::NotFound(err.to_string()),
            ProjectError::DepartmentNotInInstitution => AppError::Validation(err.to_string()),
            ProjectError::HasTransactions(_) => AppError::InvalidState(err.to_string()),
            ProjectError::Database(_) => AppError::Store(err.to_string()),
        };
        Self(app)
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        let app = match err {
            TransactionError::NotFound(_)
            | TransactionError::InstitutionNotFound(_)
            | TransactionError::DepartmentNotFound(_)
            | TransactionError::ProjectNotFound(_) => AppError::NotFound(err.to_string()),
            TransactionError::CrossInstitution(_) => AppError::Validation(err.to_string()),
            TransactionError::InvalidState(_) => AppError::InvalidState(err.to_string()),
            TransactionError::Database(_) => AppError::Store(err.to_string()),
        };
        Self(app)
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self(AppError::Store(err.to_string()))
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_errors_are_forbidden() {
        let err: ApiError = ApiError::from(AppError::Forbidden("nope".into()));
        assert_eq!(err.0.status_code(), 403);
    }

    #[test]
    fn test_store_errors_mask_details() {
        let err = ApiError::from(ReportError::Database(sea_orm::DbErr::Custom(
            "secret dsn".into(),
        )));
        assert_eq!(err.0.status_code(), 500);
        assert_eq!(err.0.public_message(), "An internal error occurred");
    }

    #[test]
    fn test_workflow_errors_split_validation_from_state() {
        let invalid = ApiError::from(WorkflowError::Validation {
            field: "amount",
            message: "must be a non-negative number".into(),
        });
        assert_eq!(invalid.0.status_code(), 400);

        let state = ApiError::from(WorkflowError::NotEditable(
            fiscora_core::workflow::TransactionStatus::Approved,
        ));
        assert_eq!(state.0.status_code(), 409);
    }
}
