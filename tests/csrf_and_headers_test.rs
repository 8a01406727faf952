// ABOUTME: Integration tests for CSRF enforcement, security headers, CORS and the health check
// ABOUTME: Exercises the middleware stack wrapped around every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use helpers::test_app::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_state_changing_request_without_token_is_forbidden() {
    let app = TestApp::new().await;

    let body: Value = AxumTestRequest::post("/api/message")
        .json(&json!({ "email": "a@b.co", "message": "hi" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["message"], "Invalid CSRF token");
    assert_eq!(body["action"], "Please refresh the page and try again");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_token_is_forbidden() {
    let app = TestApp::new().await;
    AxumTestRequest::post("/api/message")
        .csrf("deadbeef")
        .json(&json!({ "email": "a@b.co", "message": "hi" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_bound_to_another_user_is_forbidden() {
    let app = TestApp::new().await;
    let (_, first) = app.verified_session("first@example.com").await;
    let (_, second) = app.verified_session("second@example.com").await;
    let first_csrf = app.csrf_token_for(Some(&first)).await;

    AxumTestRequest::post("/api/conversations")
        .session(&second)
        .csrf(&first_csrf)
        .json(&json!({ "initialMessage": { "role": "user", "content": "hi" } }))
        .send(app.router())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    AxumTestRequest::post("/api/conversations")
        .session(&first)
        .csrf(&first_csrf)
        .json(&json!({ "initialMessage": { "role": "user", "content": "hi" } }))
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_csrf_token_endpoint_sets_readable_cookie() {
    let app = TestApp::new().await;
    let response = AxumTestRequest::get("/api/csrf-token")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);

    let cookie = response.cookie("XSRF-TOKEN").unwrap();
    let set_cookie = response.header("set-cookie").unwrap();
    assert!(!set_cookie.contains("HttpOnly"));
    let body: Value = response.json();
    assert_eq!(body["csrfToken"], cookie);
    assert_eq!(cookie.len(), 64);
}

#[tokio::test]
async fn test_csrf_token_minting_is_rate_limited() {
    let app = TestApp::with_config(|config| config.rate_limits.api = 3).await;

    for remaining in ["2", "1", "0"] {
        let response = AxumTestRequest::get("/api/csrf-token")
            .send(app.router())
            .await
            .assert_status(StatusCode::OK);
        assert_eq!(response.header("x-ratelimit-limit").as_deref(), Some("3"));
        assert_eq!(
            response.header("x-ratelimit-remaining").as_deref(),
            Some(remaining)
        );
    }

    let response = AxumTestRequest::get("/api/csrf-token")
        .send(app.router())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert!(response.header("retry-after").is_some());
    assert!(response.cookie("XSRF-TOKEN").is_none());
    assert_eq!(app.resources.csrf_manager.len().await, 3);
}

#[tokio::test]
async fn test_health_reports_uptime_and_security_headers() {
    let app = TestApp::new().await;
    let response = AxumTestRequest::get("/api/health")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(response.header("x-content-type-options").as_deref(), Some("nosniff"));
    assert_eq!(response.header("x-frame-options").as_deref(), Some("DENY"));
    assert_eq!(
        response.header("referrer-policy").as_deref(),
        Some("strict-origin-when-cross-origin")
    );

    let body: Value = response.json();
    assert_eq!(body["message"], "OK");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].as_i64().unwrap() > 1_600_000_000_000);
}

#[tokio::test]
async fn test_cors_allows_configured_origin_with_credentials() {
    let app = TestApp::new().await;
    let response = AxumTestRequest::get("/api/health")
        .header("origin", "http://localhost:5173")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("http://localhost:5173")
    );
    assert_eq!(
        response.header("access-control-allow-credentials").as_deref(),
        Some("true")
    );

    let response = AxumTestRequest::get("/api/health")
        .header("origin", "http://evil.example")
        .send(app.router())
        .await;
    assert_eq!(response.header("access-control-allow-origin"), None);
}
