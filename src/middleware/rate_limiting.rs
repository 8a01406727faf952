// ABOUTME: Rate limiting middleware for HTTP requests
// ABOUTME: Counts requests per client IP and route bucket and adds standard rate limit headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Rate Limiting Middleware with HTTP Headers
//!
//! Every counted response carries `X-RateLimit-Limit`, `X-RateLimit-Remaining`
//! and `X-RateLimit-Reset`; rejected requests also get `Retry-After`.

use crate::rate_limiting::{RateLimitBucket, RateLimitStatus};
use crate::resources::ServerResources;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use clothify_core::errors::AppError;
use http::{HeaderMap, HeaderValue};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// HTTP header names for rate limiting
pub mod headers {
    /// HTTP header name for maximum requests allowed in the current window
    pub const X_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
    /// HTTP header name for remaining requests in the current window
    pub const X_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
    /// HTTP header name for Unix timestamp when rate limit resets
    pub const X_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";
    /// HTTP header name for forwarded client addresses
    pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
}

/// Create a `HeaderMap` with rate limit headers
#[must_use]
pub fn create_rate_limit_headers(status: &RateLimitStatus) -> HeaderMap {
    let mut map = HeaderMap::new();
    let values = [
        (headers::X_RATE_LIMIT_LIMIT, status.limit.to_string()),
        (headers::X_RATE_LIMIT_REMAINING, status.remaining.to_string()),
        (headers::X_RATE_LIMIT_RESET, status.reset_at.to_string()),
    ];
    for (name, value) in values {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            map.insert(name, header_value);
        }
    }
    map
}

/// Client address: first `X-Forwarded-For` entry, else the socket peer
///
/// Requests without either (in-process tests) count as loopback.
#[must_use]
pub fn client_ip(request: &Request) -> IpAddr {
    request
        .headers()
        .get(headers::X_FORWARDED_FOR)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Enforce the budget of one route bucket
///
/// Used as `from_fn_with_state((resources, bucket), rate_limit)`.
pub async fn rate_limit(
    State((resources, bucket)): State<(Arc<ServerResources>, RateLimitBucket)>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    let status = resources.rate_limiter.check(bucket, ip);
    let rate_headers = create_rate_limit_headers(&status);

    let mut response = if status.is_limited {
        tracing::warn!(
            bucket = %bucket,
            client_ip = %ip,
            limit = status.limit,
            "Rate limit exceeded"
        );
        AppError::rate_limit_exceeded(bucket.message(), status.retry_after_secs).into_response()
    } else {
        next.run(request).await
    };

    response.headers_mut().extend(rate_headers);
    response
}
