//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::error::ApiError;
use fiscora_core::authz::{Actor, UserRole};
use fiscora_db::UserRepository;
use fiscora_shared::{AppError, Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token signature, expiry, and issuer
/// 3. Confirms the user still exists and is active
/// 4. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError(AppError::Unauthenticated(
            "Authorization header with Bearer token is required".to_string(),
        ))
        .into_response();
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            return ApiError(AppError::Unauthenticated("Token has expired".to_string()))
                .into_response();
        }
        Err(_) => {
            return ApiError(AppError::Unauthenticated(
                "Invalid or malformed token".to_string(),
            ))
            .into_response();
        }
    };

    // Deactivated users lose access immediately, not at token expiry.
    let user = match UserRepository::new((*state.db).clone())
        .find_by_id(claims.user_id())
        .await
    {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => {
            return ApiError(AppError::Unauthenticated(
                "Account is unknown or disabled".to_string(),
            ))
            .into_response();
        }
        Err(e) => {
            return ApiError::from(e).into_response();
        }
    };

    tracing::debug!(user_id = %user.id, "authenticated request");

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the authenticated user's claims:
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let actor = user.actor()?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }

    /// Returns the home institution ID from the claims.
    #[must_use]
    pub const fn institution_id(&self) -> Option<uuid::Uuid> {
        self.0.institution_id()
    }

    /// Returns the user's role string.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.0.role
    }

    /// Whether the claims carry the global admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.role == UserRole::Admin.as_str()
    }

    /// Builds the policy actor from the claims.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the role claim is not one of
    /// the known roles.
    pub fn actor(&self) -> Result<Actor, ApiError> {
        let role = UserRole::parse(&self.0.role).ok_or_else(|| {
            ApiError(AppError::Unauthenticated("Unknown role in token".to_string()))
        })?;
        Ok(Actor::new(self.user_id(), role, self.institution_id()))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthenticated("Authentication required".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }
}
