// ABOUTME: JWT session tokens and bcrypt password hashing for Clothify users
// ABOUTME: Issues HS256 tokens carried in the session cookie and validates them with detailed errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Authentication
//!
//! Sessions are stateless: a signed JWT holding the user id lives in an
//! `HttpOnly` cookie for seven days. Passwords are stored as bcrypt hashes.

use chrono::{DateTime, Duration, Utc};
use clothify_core::constants::{time, JWT_ISSUER};
use clothify_core::errors::{AppError, AppResult};
use clothify_core::models::User;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// bcrypt cost factor for stored passwords
pub const BCRYPT_COST: u32 = 10;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is not a well-formed `JWT`
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => write!(
                f,
                "JWT token expired at {}",
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            other => Self::auth_invalid(format!("Unauthorized - {other}")),
        }
    }
}

/// `JWT` claims for a user session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email at issue time
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Parse the subject as a user id
    ///
    /// # Errors
    ///
    /// Returns an auth error if the subject is not a UUID
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::auth_invalid("Unauthorized - Invalid token subject"))
    }
}

/// Authentication manager for session tokens and password hashes
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthManager {
    /// Create a manager signing with the given HMAC secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::seconds(time::SESSION_TTL_SECS))
    }

    /// Create a manager with a custom token lifetime
    #[must_use]
    pub fn with_ttl(secret: &str, token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    /// Session lifetime, used for the cookie `Max-Age`
    #[must_use]
    pub const fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Generate a session token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
            iss: JWT_ISSUER.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))
    }

    /// Validate a session token with detailed error information
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is malformed, carries a
    /// bad signature or issuer, or has expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[JWT_ISSUER]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))?;

        let now = Utc::now();
        if now.timestamp() > claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(now);
            warn!(user_id = %claims.sub, expired_at = %expired_at.to_rfc3339(), "Session token expired");
            return Err(JwtValidationError::TokenExpired { expired_at });
        }

        debug!(user_id = %claims.sub, "Session token validated");
        Ok(claims)
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        debug!("JWT token validation failed: {e:?}");

        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidIssuer => JwtValidationError::TokenInvalid {
                reason: "Token issuer is not recognised".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Hash a password for storage
    ///
    /// # Errors
    ///
    /// Returns an error if bcrypt fails
    pub fn hash_password(password: &str) -> AppResult<String> {
        bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
    }

    /// Check a password against a stored hash
    ///
    /// A malformed stored hash counts as a mismatch.
    #[must_use]
    pub fn verify_password(password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or_else(|e| {
            warn!("Stored password hash could not be verified: {e}");
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("auth@example.com", "Auth User", "hash".to_owned())
    }

    #[test]
    fn test_token_round_trip() {
        let auth = AuthManager::new("secret-one");
        let user = user();

        let token = auth.generate_token(&user).unwrap();
        let claims = auth.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, "auth@example.com");
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.exp - claims.iat, time::SESSION_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = AuthManager::new("secret-one").generate_token(&user()).unwrap();
        let err = AuthManager::new("secret-two").validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn test_expired_token_is_reported() {
        let auth = AuthManager::with_ttl("secret", Duration::seconds(-10));
        let token = auth.generate_token(&user()).unwrap();
        let err = auth.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));

        let app: AppError = err.into();
        assert_eq!(app.http_status(), 401);
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let err = AuthManager::new("secret").validate_token("not.a.jwt").unwrap_err();
        assert!(!matches!(err, JwtValidationError::TokenExpired { .. }));
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = AuthManager::hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(AuthManager::verify_password("hunter22", &hash));
        assert!(!AuthManager::verify_password("hunter23", &hash));
        assert!(!AuthManager::verify_password("hunter22", "not-a-bcrypt-hash"));
    }
}
