// ABOUTME: Integration tests for the account route handlers
// ABOUTME: Signup, OTP verification and resend, login, password reset, profile changes and logout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use axum::http::StatusCode;
use clothify::auth::AuthManager;
use clothify::constants::messages;
use helpers::axum_test::AxumTestRequest;
use helpers::test_app::{TestApp, TEST_PASSWORD};
use serde_json::{json, Value};
use uuid::Uuid;

// ============================================================================
// Signup and Verification
// ============================================================================

#[tokio::test]
async fn test_signup_verify_and_me() {
    let app = TestApp::new().await;
    let user_id = app.signup("Asha@Example.com").await;

    let stored = app
        .resources
        .database
        .users()
        .get_user(Uuid::parse_str(&user_id).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.email, "asha@example.com");
    assert!(!stored.is_verified);

    let code = app.mailer.last_code_for("asha@example.com").unwrap();
    let response = app
        .post(
            "/api/auth/verify-otp",
            &json!({ "userId": user_id, "otp": code, "context": "signup" }),
        )
        .await
        .assert_status(StatusCode::OK);
    let token = response.cookie("jwt").unwrap();
    let body: Value = response.json();
    assert_eq!(body["message"], messages::EMAIL_VERIFIED);
    assert_eq!(body["user"]["email"], "asha@example.com");
    assert_eq!(body["user"]["fullName"], "Asha Rao");

    let me: Value = AxumTestRequest::get("/api/auth/me")
        .session(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(me["success"], true);
    assert_eq!(me["user"]["_id"], user_id);
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let app = TestApp::new().await;

    let body: Value = app
        .post("/api/auth/signup", &json!({ "email": "a@b.co", "password": "secret1" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], messages::ALL_FIELDS_REQUIRED);

    let body: Value = app
        .post(
            "/api/auth/signup",
            &json!({ "email": "a@b.co", "password": "12345", "fullName": "A" }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], messages::PASSWORD_TOO_SHORT);

    let body: Value = app
        .post(
            "/api/auth/signup",
            &json!({ "email": "not-an-email", "password": "123456", "fullName": "A" }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], messages::INVALID_EMAIL);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new().await;
    app.signup("dup@example.com").await;

    let body: Value = app
        .post(
            "/api/auth/signup",
            &json!({ "email": "DUP@example.com", "password": TEST_PASSWORD, "fullName": "B" }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], messages::EMAIL_EXISTS);
}

#[tokio::test]
async fn test_wrong_code_is_rejected() {
    let app = TestApp::new().await;
    let user_id = app.signup("wrong@example.com").await;
    let code = app.mailer.last_code_for("wrong@example.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    app.post(
        "/api/auth/verify-otp",
        &json!({ "userId": user_id, "otp": wrong, "context": "signup" }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resend_honours_cooldown() {
    let app = TestApp::new().await;
    let user_id = app.signup("cool@example.com").await;

    let response = app
        .post(
            "/api/auth/resend-otp",
            &json!({ "userId": user_id, "context": "signup" }),
        )
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.header("retry-after").as_deref(), Some("120"));
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "Please wait 120 seconds before requesting a new OTP"
    );

    app.clock.advance(chrono::Duration::seconds(121));
    let first_code = app.mailer.last_code_for("cool@example.com").unwrap();
    app.post(
        "/api/auth/resend-otp",
        &json!({ "userId": user_id, "context": "signup" }),
    )
    .await
    .assert_status(StatusCode::OK);
    assert_eq!(app.mailer.sent().len(), 2);

    let second_code = app.mailer.last_code_for("cool@example.com").unwrap();
    if first_code != second_code {
        app.post(
            "/api/auth/verify-otp",
            &json!({ "userId": user_id, "otp": first_code, "context": "signup" }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_flows() {
    let app = TestApp::new().await;
    let user_id = app.signup("login@example.com").await;

    let body: Value = app
        .post(
            "/api/auth/login",
            &json!({ "email": "login@example.com", "password": "wrong-password" }),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["message"], messages::INVALID_CREDENTIALS);

    let body: Value = app
        .post(
            "/api/auth/login",
            &json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["message"], messages::INVALID_CREDENTIALS);

    // Unverified: 403 with the id, inside the cooldown no new mail goes out
    let body: Value = app
        .post(
            "/api/auth/login",
            &json!({ "email": "login@example.com", "password": TEST_PASSWORD }),
        )
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["message"], messages::ACCOUNT_UNVERIFIED);
    assert_eq!(body["userId"], user_id);
    assert_eq!(app.mailer.sent().len(), 1);

    app.clock.advance(chrono::Duration::seconds(121));
    app.post(
        "/api/auth/login",
        &json!({ "email": "login@example.com", "password": TEST_PASSWORD }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.mailer.sent().len(), 2);

    let code = app.mailer.last_code_for("login@example.com").unwrap();
    app.post(
        "/api/auth/verify-otp",
        &json!({ "userId": user_id, "otp": code }),
    )
    .await
    .assert_status(StatusCode::OK);

    let response = app
        .post(
            "/api/auth/login",
            &json!({ "email": "Login@Example.com", "password": TEST_PASSWORD }),
        )
        .await
        .assert_status(StatusCode::OK);
    assert!(response.cookie("jwt").is_some_and(|token| !token.is_empty()));
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "login@example.com");
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = TestApp::new().await;
    AxumTestRequest::get("/api/auth/me")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    AxumTestRequest::get("/api/auth/me")
        .session("garbage.token.value")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Password Reset
// ============================================================================

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::new().await;
    let (user_id, _) = app.verified_session("reset@example.com").await;

    app.post(
        "/api/auth/forgot-password",
        &json!({ "email": "ghost@example.com" }),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    let body: Value = app
        .post(
            "/api/auth/forgot-password",
            &json!({ "email": "reset@example.com" }),
        )
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["userId"], user_id);
    let code = app.mailer.last_code_for("reset@example.com").unwrap();

    // Checking the code does not consume it
    app.post(
        "/api/auth/verify-otp",
        &json!({ "userId": user_id, "otp": code, "context": "password-reset" }),
    )
    .await
    .assert_status(StatusCode::OK);

    let body: Value = app
        .post(
            "/api/auth/reset-password",
            &json!({ "userId": user_id, "otp": code, "newPassword": "brand-new-pass" }),
        )
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], messages::PASSWORD_RESET);

    // Consumed now
    app.post(
        "/api/auth/reset-password",
        &json!({ "userId": user_id, "otp": code, "newPassword": "another-pass" }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    let user = app
        .resources
        .database
        .users()
        .get_user_by_email("reset@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(AuthManager::verify_password("brand-new-pass", &user.password_hash));

    app.post(
        "/api/auth/login",
        &json!({ "email": "reset@example.com", "password": "brand-new-pass" }),
    )
    .await
    .assert_status(StatusCode::OK);
}

// ============================================================================
// Profile and Logout
// ============================================================================

#[tokio::test]
async fn test_profile_name_change_applies_immediately() {
    let app = TestApp::new().await;
    let (_, token) = app.verified_session("name@example.com").await;
    let csrf = app.csrf_token_for(Some(&token)).await;

    let body: Value = AxumTestRequest::put("/api/auth/profile")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "newName": "Asha R." }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["otpRequired"], false);
    assert_eq!(body["message"], messages::PROFILE_UPDATED);
    assert_eq!(body["user"]["fullName"], "Asha R.");

    AxumTestRequest::put("/api/auth/profile")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({}))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_name_is_not_saved_when_code_is_cooling_down() {
    let app = TestApp::new().await;
    let (user_id, token) = app.verified_session("cool@example.com").await;
    let csrf = app.csrf_token_for(Some(&token)).await;

    AxumTestRequest::put("/api/auth/profile")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "newEmail": "first@example.com" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);

    let response = AxumTestRequest::put("/api/auth/profile")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "newName": "Renamed", "newEmail": "second@example.com" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert!(response.header("retry-after").is_some());

    let stored = app
        .resources
        .database
        .users()
        .get_user(Uuid::parse_str(&user_id).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.full_name, "Asha Rao");
}

#[tokio::test]
async fn test_email_change_waits_for_code() {
    let app = TestApp::new().await;
    let (user_id, token) = app.verified_session("old@example.com").await;
    app.signup("taken@example.com").await;
    let csrf = app.csrf_token_for(Some(&token)).await;

    let body: Value = AxumTestRequest::put("/api/auth/profile")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "newEmail": "taken@example.com" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], messages::EMAIL_IN_USE);

    let body: Value = AxumTestRequest::put("/api/auth/profile")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "newEmail": "new@example.com" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["otpRequired"], true);
    assert_eq!(body["user"]["email"], "old@example.com");

    // The code goes to the address that is already proven
    let code = app.mailer.last_code_for("old@example.com").unwrap();
    let response = AxumTestRequest::post("/api/auth/verify-otp")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "userId": user_id, "otp": code, "context": "profile-update" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert!(response.cookie("jwt").is_some());
    let body: Value = response.json();
    assert_eq!(body["user"]["email"], "new@example.com");
}

#[tokio::test]
async fn test_account_deletion_after_code() {
    let app = TestApp::new().await;
    let (user_id, token) = app.verified_session("bye@example.com").await;
    let csrf = app.csrf_token_for(Some(&token)).await;

    AxumTestRequest::put("/api/auth/profile")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "deleteAccount": true }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);

    let code = app.mailer.last_code_for("bye@example.com").unwrap();
    let response = AxumTestRequest::post("/api/auth/verify-otp")
        .session(&token)
        .csrf(&csrf)
        .json(&json!({ "userId": user_id, "otp": code, "context": "profile-update" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.cookie("jwt").as_deref(), Some(""));
    let body: Value = response.json();
    assert_eq!(body["message"], messages::ACCOUNT_DELETED);

    assert!(app
        .resources
        .database
        .users()
        .get_user_by_email("bye@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_logout_clears_cookies_and_csrf_token() {
    let app = TestApp::new().await;
    let (_, token) = app.verified_session("out@example.com").await;
    let csrf = app.csrf_token_for(Some(&token)).await;

    let response = AxumTestRequest::post("/api/auth/logout")
        .session(&token)
        .csrf(&csrf)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.cookie("jwt").as_deref(), Some(""));
    assert_eq!(response.cookie("XSRF-TOKEN").as_deref(), Some(""));
    let body: Value = response.json();
    assert_eq!(body["message"], messages::LOGOUT);

    AxumTestRequest::post("/api/auth/logout")
        .session(&token)
        .csrf(&csrf)
        .send(app.router())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_of_deleted_account_must_log_in_again() {
    let app = TestApp::new().await;
    let (user_id, token) = app.verified_session("gone@example.com").await;
    assert!(app
        .resources
        .database
        .users()
        .delete_user(Uuid::parse_str(&user_id).unwrap())
        .await
        .unwrap());

    let body: Value = AxumTestRequest::get("/api/auth/me")
        .session(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["message"], messages::USER_NOT_FOUND);

    AxumTestRequest::get("/api/conversations")
        .session(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_google_routes_are_absent_without_configuration() {
    let app = TestApp::new().await;
    AxumTestRequest::get("/api/auth/google")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = AxumTestRequest::get("/api/auth/google/callback?code=abc&state=xyz")
        .send(app.router())
        .await
        .assert_status(StatusCode::FOUND);
    let location = response.header("location").unwrap();
    assert!(location.starts_with("http://localhost:5173/login?error=true&code=OAUTH_FAILURE"));
}
