// ABOUTME: CORS middleware configuration for the browser frontend
// ABOUTME: Allows the configured frontend origins with credentials so session cookies flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use crate::config::ServerConfig;
use clothify_core::constants::cookies::CSRF_HEADER;
use http::{header, header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS for the frontend origins
///
/// Credentialed CORS cannot use a wildcard origin, so the allow list is the
/// comma-separated `FRONTEND_URL` value. Origins that are not valid header
/// values are skipped; if none remain the primary frontend URL is used.
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim_end_matches('/')).ok())
        .collect();

    if origins.is_empty() {
        if let Ok(origin) = HeaderValue::from_str(&config.frontend_url) {
            origins.push(origin);
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(CSRF_HEADER),
            header::AUTHORIZATION,
        ])
}
