//! Authentication types: JWT claims and auth request/response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// JWT claims for bearer tokens.
///
/// A single token per login; there is no refresh-token pair. The home
/// institution is absent for the global admin role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Home institution ID (None for the global admin).
    pub inst: Option<Uuid>,
    /// User's role.
    pub role: String,
    /// Token issuer.
    pub iss: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        institution_id: Option<Uuid>,
        role: &str,
        issuer: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            inst: institution_id,
            role: role.to_string(),
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the home institution ID from claims.
    #[must_use]
    pub const fn institution_id(&self) -> Option<Uuid> {
        self.inst
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    /// User full name.
    #[validate(length(min = 2, max = 200, message = "must be 2-200 characters"))]
    pub full_name: String,
    /// Home institution (required for every role except admin).
    pub institution_id: Option<Uuid>,
    /// Requested role; public registration only ever yields `viewer`.
    pub role: Option<String>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Response returned after successful registration or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
    /// Authenticated user info.
    pub user: UserInfo,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
    /// User role.
    pub role: String,
    /// Home institution ID.
    pub institution_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_carry_identity() {
        let user_id = Uuid::new_v4();
        let inst_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            Some(inst_id),
            "institution_admin",
            "fiscora",
            Utc::now() + chrono::Duration::hours(1),
        );

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.institution_id(), Some(inst_id));
        assert_eq!(claims.role, "institution_admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_admin_claims_have_no_institution() {
        let claims = Claims::new(
            Uuid::new_v4(),
            None,
            "admin",
            "fiscora",
            Utc::now() + chrono::Duration::hours(1),
        );
        assert_eq!(claims.institution_id(), None);
    }

    #[test]
    fn test_register_request_validation() {
        use validator::Validate;

        let bad = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            full_name: "x".into(),
            institution_id: None,
            role: None,
        };
        assert!(bad.validate().is_err());

        let good = RegisterRequest {
            email: "clerk@example.org".into(),
            password: "long-enough-password".into(),
            full_name: "Jordan Clerk".into(),
            institution_id: Some(Uuid::new_v4()),
            role: None,
        };
        assert!(good.validate().is_ok());
    }
}
