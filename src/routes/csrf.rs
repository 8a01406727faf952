// ABOUTME: CSRF token endpoint minting tokens bound to the session user when one is present
// ABOUTME: The token is returned in the body and mirrored in the readable XSRF-TOKEN cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use crate::middleware::optional_user_id;
use crate::resources::ServerResources;
use crate::security::cookies::append_set_cookie;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// CSRF token response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    /// Token to echo in `X-CSRF-Token`
    pub csrf_token: String,
}

/// CSRF routes handler
pub struct CsrfRoutes;

impl CsrfRoutes {
    /// Create the token route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/csrf-token", get(Self::issue_token))
            .with_state(resources)
    }

    async fn issue_token(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        let user_id = optional_user_id(&resources, &headers);
        let csrf_token = resources.csrf_manager.generate_token(user_id).await;

        let mut response_headers = HeaderMap::new();
        append_set_cookie(
            &mut response_headers,
            &resources.cookie_policy.csrf_cookie(&csrf_token),
        );
        tracing::debug!(bound = user_id.is_some(), "CSRF token issued");

        (response_headers, Json(CsrfTokenResponse { csrf_token })).into_response()
    }
}
