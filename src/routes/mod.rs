// ABOUTME: Route module organization for the Clothify HTTP API
// ABOUTME: Assembles the domain routers, their rate limit buckets and the shared middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! Route module for Clothify
//!
//! Each domain module owns its route definitions and thin handlers. Every
//! group is wrapped in the rate limit bucket it belongs to, the merged
//! router is CSRF-checked and mounted under `/api`.

/// Stylist chat and chat log routes
pub mod assistant;
/// Account, OTP and Google sign-in routes
pub mod auth;
/// Contact form and support routes
pub mod contact;
/// Conversation thread routes
pub mod conversations;
/// CSRF token route
pub mod csrf;
/// Health check route
pub mod health;

/// Stylist route handlers
pub use assistant::AssistantRoutes;
/// Authentication route handlers
pub use auth::AuthRoutes;
/// Contact and support route handlers
pub use contact::ContactRoutes;
/// Conversation route handlers
pub use conversations::ConversationRoutes;
/// CSRF token route handler
pub use csrf::CsrfRoutes;
/// Health check route handler
pub use health::HealthRoutes;

use crate::middleware::{
    csrf_protection, make_request_span, rate_limit, setup_cors, with_security_headers,
};
use crate::rate_limiting::RateLimitBucket;
use crate::resources::ServerResources;
use axum::{http::StatusCode, middleware, Router};
use clothify_core::constants::{endpoints, limits};
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Upper bound for one request, generous enough for the full model fallback
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn limited(router: Router, resources: &Arc<ServerResources>, bucket: RateLimitBucket) -> Router {
    router.layer(middleware::from_fn_with_state(
        (resources.clone(), bucket),
        rate_limit,
    ))
}

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let api = Router::new()
        .merge(limited(
            AuthRoutes::routes(resources.clone()),
            &resources,
            RateLimitBucket::Auth,
        ))
        .merge(limited(
            AssistantRoutes::routes(resources.clone()),
            &resources,
            RateLimitBucket::Api,
        ))
        .merge(limited(
            ConversationRoutes::routes(resources.clone()),
            &resources,
            RateLimitBucket::Api,
        ))
        .merge(limited(
            ContactRoutes::message_routes(resources.clone()),
            &resources,
            RateLimitBucket::Message,
        ))
        .merge(limited(
            ContactRoutes::support_routes(resources.clone()),
            &resources,
            RateLimitBucket::Support,
        ))
        .merge(limited(
            CsrfRoutes::routes(resources.clone()),
            &resources,
            RateLimitBucket::Api,
        ))
        .merge(HealthRoutes::routes(resources.clone()))
        .layer(middleware::from_fn_with_state(
            resources.clone(),
            csrf_protection,
        ));

    let app = Router::new().nest(endpoints::API_BASE, api);

    with_security_headers(app)
        .layer(RequestBodyLimitLayer::new(limits::MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(setup_cors(&resources.config))
}
