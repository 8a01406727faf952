// ABOUTME: CSRF validation middleware for state-changing HTTP requests
// ABOUTME: Validates the X-CSRF-Token header against server-held tokens and the current session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! CSRF validation middleware
//!
//! POST, PUT, PATCH and DELETE requests must carry a token minted by
//! `/csrf-token` in the `X-CSRF-Token` header. A token minted for a session
//! is only accepted alongside that same session.

use super::auth::optional_user_id;
use crate::resources::ServerResources;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use clothify_core::constants::cookies::CSRF_HEADER;
use clothify_core::errors::AppError;
use std::sync::Arc;

/// Check if request requires CSRF validation
#[must_use]
pub fn requires_csrf_validation(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    )
}

/// Reject state-changing requests without a valid CSRF token
pub async fn csrf_protection(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    if !requires_csrf_validation(&method) {
        return next.run(request).await;
    }

    let Some(token) = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
    else {
        tracing::warn!(
            method = %method,
            path = %request.uri().path(),
            "CSRF token missing for state-changing request"
        );
        return AppError::csrf_invalid().into_response();
    };

    let session_user = optional_user_id(&resources, request.headers());
    if let Err(e) = resources
        .csrf_manager
        .validate_token(&token, session_user)
        .await
    {
        tracing::warn!(
            method = %method,
            path = %request.uri().path(),
            "CSRF token validation failed"
        );
        return e.into_response();
    }

    tracing::debug!(method = %method, "CSRF token validated successfully");
    next.run(request).await
}
