// ABOUTME: Session authentication helpers for route handlers
// ABOUTME: Reads the jwt cookie or a Bearer header, validates it and loads the user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use crate::auth::Claims;
use crate::resources::ServerResources;
use crate::security::cookies::get_cookie_value;
use axum::http::HeaderMap;
use clothify_core::constants::cookies::SESSION_COOKIE;
use clothify_core::constants::messages;
use clothify_core::errors::{AppError, AppResult};
use clothify_core::models::User;
use tracing::{debug, warn, Span};
use uuid::Uuid;

/// Session token from the `jwt` cookie, falling back to `Authorization: Bearer`
fn session_token(headers: &HeaderMap) -> Option<String> {
    get_cookie_value(headers, SESSION_COOKIE).or_else(|| {
        headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
    })
}

/// Validate the session token, if any
///
/// # Errors
///
/// Returns an authentication error when a token is present but invalid or expired
pub fn session_claims(
    resources: &ServerResources,
    headers: &HeaderMap,
) -> AppResult<Option<Claims>> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };
    let claims = resources.auth_manager.validate_token(&token).map_err(|e| {
        debug!("Session token rejected: {e}");
        AppError::from(e)
    })?;
    Ok(Some(claims))
}

/// User id of a valid session, ignoring missing or invalid tokens
#[must_use]
pub fn optional_user_id(resources: &ServerResources, headers: &HeaderMap) -> Option<Uuid> {
    session_claims(resources, headers)
        .ok()
        .flatten()
        .and_then(|claims| claims.user_id().ok())
}

/// Load the user behind the session
///
/// # Errors
///
/// Returns `AuthRequired` without a token, `AuthInvalid`/`AuthExpired` for a
/// bad token, and `AuthInvalid` when the account no longer exists
pub async fn require_user(resources: &ServerResources, headers: &HeaderMap) -> AppResult<User> {
    let claims = session_claims(resources, headers)?.ok_or_else(AppError::auth_required)?;
    let user_id = claims.user_id()?;

    let user = resources
        .database
        .users()
        .get_user(user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "Session refers to a deleted user");
            AppError::auth_invalid(messages::USER_NOT_FOUND)
        })?;

    Span::current().record("user_id", user.id.to_string());
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_wins_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("jwt=from-cookie"));
        headers.insert("authorization", HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));

        headers.remove("cookie");
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(session_token(&headers), None);
    }
}
