// ABOUTME: HTTP middleware for sessions, CSRF, CORS, rate limiting, security headers and tracing
// ABOUTME: Layers wrap the axum router; session helpers are called from handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

/// Session cookie and bearer token authentication
pub mod auth;
/// CORS layer for the configured frontend origin
pub mod cors;
/// CSRF header check on state-changing requests
pub mod csrf;
/// Per-IP rate limit layer and headers
pub mod rate_limiting;
/// Response hardening headers
pub mod security_headers;
/// Request spans and request ids
pub mod tracing;

// Session extraction
pub use auth::{optional_user_id, require_user, session_claims};

// CORS configuration
pub use cors::setup_cors;

// CSRF enforcement
pub use csrf::{csrf_protection, requires_csrf_validation};

// Rate limiting middleware and utilities
pub use rate_limiting::{client_ip, create_rate_limit_headers, headers, rate_limit};

// Response hardening
pub use security_headers::with_security_headers;

// Request tracing
pub use self::tracing::{make_request_span, RequestContext};
