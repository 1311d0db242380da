//! JWT token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in hours.
    pub expiry_hours: i64,
    /// Token issuer.
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiry_hours: 24,
            issuer: "fiscora".to_string(),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a bearer token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_token(
        &self,
        user_id: Uuid,
        institution_id: Option<Uuid>,
        role: &str,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::hours(self.config.expiry_hours);
        let claims = Claims::new(
            user_id,
            institution_id,
            role,
            &self.config.issuer,
            expires_at,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the token expiration in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.config.expiry_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            expiry_hours: 1,
            issuer: "fiscora".to_string(),
        })
    }

    #[test]
    fn test_generate_token() {
        let service = create_test_service();
        let token = service
            .generate_token(Uuid::new_v4(), Some(Uuid::new_v4()), "viewer")
            .unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_validate_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let inst_id = Uuid::new_v4();

        let token = service
            .generate_token(user_id, Some(inst_id), "institution_admin")
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.institution_id(), Some(inst_id));
        assert_eq!(claims.role, "institution_admin");
    }

    #[test]
    fn test_admin_token_without_institution() {
        let service = create_test_service();
        let token = service.generate_token(Uuid::new_v4(), None, "admin").unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.institution_id(), None);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = create_test_service();
        let token = service.generate_token(Uuid::new_v4(), None, "admin").unwrap();

        let other = JwtService::new(JwtConfig {
            secret: "a-different-secret".to_string(),
            expiry_hours: 1,
            issuer: "fiscora".to_string(),
        });
        assert!(other.validate_token(&token).is_err());
    }
}
