// ABOUTME: Unified error type with stable error codes and HTTP status mapping
// ABOUTME: Renders errors as JSON bodies for axum handlers behind the http-response feature
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Unified Error Handling System
//!
//! Every fallible operation in the service returns [`AppResult`]. Errors carry
//! an [`ErrorCode`] that decides the HTTP status, a client-facing message, and
//! optional extra fields that are merged into the JSON body.
//!
//! Server-side failures (5xx) are logged with their full message and rendered
//! to the client with a generic message only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Message shown to clients for any 5xx failure
pub const GENERIC_SERVER_MESSAGE: &str = "Internal Server Error";

/// Instruction attached to CSRF rejections
pub const CSRF_REFRESH_ACTION: &str = "Please refresh the page and try again";

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// No session was presented
    AuthRequired = 1000,
    /// Credentials or session token are wrong
    AuthInvalid = 1001,
    /// Session token has expired
    AuthExpired = 1002,
    /// Authenticated but not allowed to touch the resource
    PermissionDenied = 1003,
    /// Anti-forgery token missing or mismatched
    CsrfInvalid = 1004,
    /// Account exists but the email is not verified yet
    AccountUnverified = 1005,

    // Rate Limiting (2000-2999)
    /// Caller exceeded a request or resend budget
    RateLimitExceeded = 2000,

    // Validation (3000-3999)
    /// Generic validation failure
    InvalidInput = 3000,
    /// A required field is absent or blank
    MissingRequiredField = 3001,
    /// A field has the wrong shape (email, length)
    InvalidFormat = 3002,
    /// One-time code is wrong, expired or already used
    OtpInvalid = 3003,

    // Resource Management (4000-4999)
    /// Record does not exist
    ResourceNotFound = 4000,
    /// Unique key already taken
    ResourceAlreadyExists = 4001,

    // External Services (5000-5999)
    /// Upstream service failed
    ExternalServiceError = 5000,
    /// Upstream service answered with HTTP 429
    ExternalRateLimited = 5001,
    /// OAuth identity provider rejected the exchange
    ExternalAuthFailed = 5002,
    /// SMTP relay failed
    MailDeliveryFailed = 5003,

    // Configuration (6000-6999)
    /// Configuration present but unusable
    ConfigError = 6000,
    /// Required configuration missing
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Unexpected failure
    InternalError = 9000,
    /// Database operation failed
    DatabaseError = 9001,
    /// Serialization or deserialization failed
    SerializationError = 9002,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::OtpInvalid
            | Self::ResourceAlreadyExists => 400,

            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,

            Self::PermissionDenied | Self::CsrfInvalid | Self::AccountUnverified => 403,

            Self::ResourceNotFound => 404,

            Self::RateLimitExceeded => 429,

            Self::ExternalServiceError
            | Self::ExternalAuthFailed
            | Self::ExternalRateLimited
            | Self::MailDeliveryFailed
            | Self::ConfigError
            | Self::ConfigMissing
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError => 500,
        }
    }

    /// Get a short description of this error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::CsrfInvalid => "Invalid CSRF token",
            Self::AccountUnverified => "The account email has not been verified",
            Self::RateLimitExceeded => "Too many requests, please try again later",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::OtpInvalid => "The one-time code is invalid or expired",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::MailDeliveryFailed => "Email delivery failed",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether the message of this error may be shown to clients
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        self.http_status() < 500
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Extra fields merged into the JSON response body
    pub details: Map<String, Value>,
    /// Seconds the client should wait before retrying (sets `Retry-After`)
    pub retry_after_secs: Option<u64>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Map::new(),
            retry_after_secs: None,
            source: None,
        }
    }

    /// Attach one extra field to the response body
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Attach a retry hint in seconds
    #[must_use]
    pub const fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after_secs = Some(seconds);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether this error is an upstream HTTP 429
    #[must_use]
    pub fn is_external_rate_limit(&self) -> bool {
        self.code == ErrorCode::ExternalRateLimited
    }

    // ------------------------------------------------------------------
    // Convenience constructors
    // ------------------------------------------------------------------

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "No token provided")
    }

    /// Invalid authentication
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Session has expired, please log in again")
    }

    /// Authenticated user may not access the resource
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// CSRF token missing, unknown, expired or bound to another session
    #[must_use]
    pub fn csrf_invalid() -> Self {
        Self::new(ErrorCode::CsrfInvalid, "Invalid CSRF token")
            .with_detail("action", CSRF_REFRESH_ACTION)
    }

    /// Rate limit exceeded with the number of seconds until the window resets
    #[must_use]
    pub fn rate_limit_exceeded(message: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::new(ErrorCode::RateLimitExceeded, message).with_retry_after(retry_after_secs)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Unique key already taken
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing
    #[must_use]
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Field has the wrong format
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// One-time code rejected
    #[must_use]
    pub fn otp_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::OtpInvalid, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Mail delivery error
    #[must_use]
    pub fn mail(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MailDeliveryFailed, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body
///
/// Extra detail fields are flattened next to `message` and `code`, so a CSRF
/// rejection renders as `{"message": "...", "code": "CSRF_INVALID", "action": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Client-facing message
    pub message: String,
    /// Stable error code
    pub code: ErrorCode,
    /// Extra fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        let message = if error.code.is_client_error() {
            error.message.clone()
        } else {
            GENERIC_SERVER_MESSAGE.to_owned()
        };
        Self {
            message,
            code: error.code,
            details: error.details.clone(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string()).with_source(error)
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.status().map(|s| s.as_u16()) == Some(429) {
            Self::new(ErrorCode::ExternalRateLimited, error.to_string())
        } else {
            Self::external_service("http", error.to_string())
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ErrorResponse};
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::{header, HeaderValue, StatusCode};

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if status.is_server_error() {
                tracing::error!(code = ?self.code, error = %self.message, "request failed");
            } else {
                tracing::debug!(code = ?self.code, error = %self.message, "request rejected");
            }

            let body = ErrorResponse::from(&self);
            let mut response = (status, Json(body)).into_response();
            if let Some(seconds) = self.retry_after_secs {
                if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::CsrfInvalid.http_status(), 403);
        assert_eq!(ErrorCode::RateLimitExceeded.http_status(), 429);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ResourceAlreadyExists.http_status(), 400);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_csrf_error_body_carries_action() {
        let response = ErrorResponse::from(&AppError::csrf_invalid());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["message"], "Invalid CSRF token");
        assert_eq!(json["code"], "CSRF_INVALID");
        assert_eq!(json["action"], CSRF_REFRESH_ACTION);
    }

    #[test]
    fn test_server_errors_hide_internal_message() {
        let error = AppError::database("UNIQUE constraint failed: users.email");
        let response = ErrorResponse::from(&error);

        assert_eq!(response.message, GENERIC_SERVER_MESSAGE);
        assert!(error.to_string().contains("UNIQUE constraint"));
    }

    #[test]
    fn test_rate_limit_carries_retry_hint() {
        let error = AppError::rate_limit_exceeded("slow down", 42);
        assert_eq!(error.retry_after_secs, Some(42));
        assert_eq!(error.http_status(), 429);
    }
}
