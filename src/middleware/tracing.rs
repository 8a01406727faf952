// ABOUTME: Request tracing spans for correlation and structured logging
// ABOUTME: Reuses an incoming X-Request-Id or generates one, and leaves room for the session user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use axum::extract::Request;
use tracing::Span;
use uuid::Uuid;

/// Request id header
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request context recorded on the request span
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id
    pub request_id: String,
}

impl RequestContext {
    /// Context for `request`, keeping a caller-supplied request id
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|id| !id.is_empty())
            .map_or_else(
                || format!("req_{}", Uuid::new_v4().simple()),
                str::to_owned,
            );
        Self { request_id }
    }
}

/// Span for one HTTP request; `user_id` is filled in once a session is loaded
pub fn make_request_span(request: &Request) -> Span {
    let context = RequestContext::from_request(request);
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %context.request_id,
        user_id = tracing::field::Empty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_request_id_is_reused_or_generated() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(RequestContext::from_request(&request).request_id, "abc");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(RequestContext::from_request(&request)
            .request_id
            .starts_with("req_"));
    }
}
