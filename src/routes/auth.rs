// ABOUTME: Account route handlers for signup, login, OTP verification, password reset and profile
// ABOUTME: Also hosts the Google OAuth redirect and callback that finish in a session cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! Authentication routes
//!
//! Sessions are JWTs delivered in the http-only `jwt` cookie. Every flow that
//! proves ownership of an email address goes through a one-time code mailed
//! by [`deliver_otp`].

use crate::auth::AuthManager;
use crate::database::UserUpdate;
use crate::mailer::OutgoingMail;
use crate::middleware::require_user;
use crate::oauth::{GoogleOAuthClient, GoogleProfile};
use crate::otp::{OtpContext, OtpPayload};
use crate::resources::ServerResources;
use crate::security::cookies::{append_set_cookie, get_cookie_value};
use crate::validation::{required, validate_email, validate_password};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use clothify_core::constants::cookies::{
    CSRF_COOKIE, CSRF_HEADER, OAUTH_STATE_COOKIE, OAUTH_STATE_TTL_SECS, SESSION_COOKIE,
};
use clothify_core::constants::messages;
use clothify_core::errors::{AppError, AppResult, ErrorCode};
use clothify_core::models::{default_avatar_url, PublicUser, User};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Length of the throwaway password given to OAuth-created accounts
const OAUTH_PASSWORD_LENGTH: usize = 32;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Signup request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Account email
    pub email: Option<String>,
    /// Plain password
    pub password: Option<String>,
    /// Display name
    pub full_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: Option<String>,
    /// Plain password
    pub password: Option<String>,
}

/// Code confirmation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    /// Subject the code was issued to
    pub user_id: Option<String>,
    /// Six digit code
    pub otp: Option<String>,
    /// Flow the code belongs to, `signup` when omitted
    pub context: Option<String>,
}

/// Code resend request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    /// Subject of the code
    pub user_id: Option<String>,
    /// Flow the code belongs to, `signup` when omitted
    pub context: Option<String>,
}

/// Password reset kickoff
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Account email
    pub email: Option<String>,
}

/// Password reset completion
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Subject of the reset code
    pub user_id: Option<String>,
    /// Six digit code
    pub otp: Option<String>,
    /// Replacement password
    pub new_password: Option<String>,
}

/// Profile change request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Applied immediately
    pub new_name: Option<String>,
    /// Applied after code confirmation
    pub new_email: Option<String>,
    /// Applied after code confirmation
    pub new_password: Option<String>,
    /// Applied after code confirmation
    #[serde(default)]
    pub delete_account: bool,
}

/// Profile change outcome
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    /// Always true
    pub success: bool,
    /// Whether a code must be confirmed before the rest applies
    pub otp_required: bool,
    /// Human readable outcome
    pub message: String,
    /// User after the immediate changes
    pub user: PublicUser,
}

/// Google redirect query
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    /// Authorization code
    pub code: Option<String>,
    /// Echoed state
    pub state: Option<String>,
    /// Provider-side error
    pub error: Option<String>,
}

// ============================================================================
// Auth Routes
// ============================================================================

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/signup", post(Self::signup))
            .route("/auth/login", post(Self::login))
            .route("/auth/verify-otp", post(Self::verify_otp))
            .route("/auth/resend-otp", post(Self::resend_otp))
            .route("/auth/forgot-password", post(Self::forgot_password))
            .route("/auth/reset-password", post(Self::reset_password))
            .route("/auth/logout", post(Self::logout))
            .route("/auth/profile", put(Self::update_profile))
            .route("/auth/me", get(Self::me))
            .route("/auth/google", get(Self::google_redirect))
            .route("/auth/google/callback", get(Self::google_callback))
            .with_state(resources)
    }

    /// Handle account creation
    async fn signup(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SignupRequest>,
    ) -> Result<Response, AppError> {
        let email = required(request.email.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        let full_name = required(request.full_name.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        let password = raw_password(request.password.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        validate_password(password)?;
        validate_email(email)?;

        let users = resources.database.users();
        if users.get_user_by_email(&email.to_lowercase()).await?.is_some() {
            return Err(AppError::already_exists(messages::EMAIL_EXISTS));
        }

        let user = User::new(email, full_name, AuthManager::hash_password(password)?);
        users.create_user(&user).await?;

        if let Err(e) =
            deliver_otp(&resources, user.id, &user.email, OtpContext::Signup, OtpPayload::None)
                .await
        {
            warn!(user_id = %user.id, "Signup code delivery failed, rolling back account");
            users.delete_user(user.id).await?;
            return Err(e);
        }

        info!(user_id = %user.id, "User registered, awaiting verification");
        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": messages::SIGNUP_OTP_SENT,
                "userId": user.id,
            })),
        )
            .into_response())
    }

    /// Handle email and password login
    async fn login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let email = required(request.email.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        let password = raw_password(request.password.as_deref(), messages::ALL_FIELDS_REQUIRED)?;

        let user = resources
            .database
            .users()
            .get_user_by_email(&email.to_lowercase())
            .await?
            .filter(|user| AuthManager::verify_password(password, &user.password_hash))
            .ok_or_else(|| AppError::auth_invalid(messages::INVALID_CREDENTIALS))?;

        if !user.is_verified {
            match deliver_otp(&resources, user.id, &user.email, OtpContext::Signup, OtpPayload::None)
                .await
            {
                Ok(()) => info!(user_id = %user.id, "Unverified login, fresh signup code sent"),
                Err(e) if e.code == ErrorCode::RateLimitExceeded => {
                    info!(user_id = %user.id, "Unverified login inside resend cooldown");
                }
                Err(e) => return Err(e),
            }
            return Ok((
                StatusCode::FORBIDDEN,
                Json(json!({
                    "message": messages::ACCOUNT_UNVERIFIED,
                    "userId": user.id,
                })),
            )
                .into_response());
        }

        let headers = session_headers(&resources, &user)?;
        info!(user_id = %user.id, "User logged in");
        Ok((
            headers,
            Json(json!({ "success": true, "user": user.to_public() })),
        )
            .into_response())
    }

    /// Confirm a one-time code for any of the three flows
    async fn verify_otp(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<VerifyOtpRequest>,
    ) -> Result<Response, AppError> {
        let user_id = parse_user_id(request.user_id.as_deref())?;
        let code = required(request.otp.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        let context = parse_context(request.context.as_deref())?;

        let users = resources.database.users();
        let user = users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        match context {
            OtpContext::Signup => {
                resources
                    .otp_store
                    .verify(user_id, context, code, true)
                    .await?;
                let user = users
                    .update_user(
                        user_id,
                        &UserUpdate {
                            is_verified: Some(true),
                            ..UserUpdate::default()
                        },
                    )
                    .await?;
                let headers = session_headers(&resources, &user)?;
                info!(user_id = %user.id, "Email verified");
                Ok((
                    headers,
                    Json(json!({
                        "success": true,
                        "message": messages::EMAIL_VERIFIED,
                        "user": user.to_public(),
                    })),
                )
                    .into_response())
            }
            OtpContext::PasswordReset => {
                resources
                    .otp_store
                    .verify(user_id, context, code, false)
                    .await?;
                Ok(Json(json!({ "success": true, "message": messages::OTP_VERIFIED }))
                    .into_response())
            }
            OtpContext::ProfileUpdate => {
                let payload = resources
                    .otp_store
                    .verify(user_id, context, code, true)
                    .await?;
                apply_profile_change(&resources, &user, payload).await
            }
        }
    }

    /// Mail a new code, keeping any pending profile change
    async fn resend_otp(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ResendOtpRequest>,
    ) -> Result<Response, AppError> {
        let user_id = parse_user_id(request.user_id.as_deref())?;
        let context = parse_context(request.context.as_deref())?;

        let user = resources
            .database
            .users()
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if context == OtpContext::Signup && user.is_verified {
            return Err(AppError::invalid_input(messages::ALREADY_VERIFIED));
        }

        match resources.otp_store.refresh(user_id, context).await? {
            Some(issued) => {
                send_or_discard(&resources, user_id, &user.email, context, &issued.code).await?;
            }
            None if context == OtpContext::ProfileUpdate => {
                return Err(AppError::invalid_input(messages::NO_PENDING_CHANGE));
            }
            None => {
                deliver_otp(&resources, user_id, &user.email, context, OtpPayload::None).await?;
            }
        }

        info!(user_id = %user_id, context = %context, "Code resent");
        Ok(Json(json!({ "success": true, "message": messages::OTP_SENT })).into_response())
    }

    /// Start a password reset
    async fn forgot_password(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ForgotPasswordRequest>,
    ) -> Result<Response, AppError> {
        let email = required(request.email.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        validate_email(email)?;

        let user = resources
            .database
            .users()
            .get_user_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        deliver_otp(
            &resources,
            user.id,
            &user.email,
            OtpContext::PasswordReset,
            OtpPayload::None,
        )
        .await?;

        Ok(Json(json!({
            "success": true,
            "message": messages::OTP_SENT,
            "userId": user.id,
        }))
        .into_response())
    }

    /// Finish a password reset
    async fn reset_password(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ResetPasswordRequest>,
    ) -> Result<Response, AppError> {
        let user_id = parse_user_id(request.user_id.as_deref())?;
        let code = required(request.otp.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        let password =
            raw_password(request.new_password.as_deref(), messages::ALL_FIELDS_REQUIRED)?;
        validate_password(password)?;

        resources
            .otp_store
            .verify(user_id, OtpContext::PasswordReset, code, true)
            .await?;

        resources
            .database
            .users()
            .update_user(
                user_id,
                &UserUpdate {
                    password_hash: Some(AuthManager::hash_password(password)?),
                    ..UserUpdate::default()
                },
            )
            .await?;

        info!(user_id = %user_id, "Password reset");
        Ok(Json(json!({ "success": true, "message": messages::PASSWORD_RESET })).into_response())
    }

    /// End the session
    async fn logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;

        if let Some(token) = headers.get(CSRF_HEADER).and_then(|h| h.to_str().ok()) {
            resources.csrf_manager.invalidate_token(token).await;
        }

        let mut response_headers = HeaderMap::new();
        append_set_cookie(
            &mut response_headers,
            &resources.cookie_policy.clear_cookie(SESSION_COOKIE),
        );
        append_set_cookie(
            &mut response_headers,
            &resources.cookie_policy.clear_cookie(CSRF_COOKIE),
        );

        info!(user_id = %user.id, "User logged out");
        Ok((
            response_headers,
            Json(json!({ "success": true, "message": messages::LOGOUT })),
        )
            .into_response())
    }

    /// Change profile fields; sensitive changes wait for a code
    async fn update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpdateProfileRequest>,
    ) -> Result<Response, AppError> {
        let mut user = require_user(&resources, &headers).await?;
        let users = resources.database.users();

        let new_name = request
            .new_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != user.full_name);

        let new_email = match request
            .new_email
            .as_deref()
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty() && *email != user.email)
        {
            Some(email) => {
                validate_email(&email)?;
                if users.get_user_by_email(&email).await?.is_some() {
                    return Err(AppError::already_exists(messages::EMAIL_IN_USE));
                }
                Some(email)
            }
            None => None,
        };

        let new_password_hash = match request.new_password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => {
                validate_password(password)?;
                Some(AuthManager::hash_password(password)?)
            }
            None => None,
        };

        let sensitive =
            new_email.is_some() || new_password_hash.is_some() || request.delete_account;
        if new_name.is_none() && !sensitive {
            return Err(AppError::invalid_input(messages::NO_PROFILE_CHANGES));
        }

        // The name is only saved once the code for the sensitive part is out
        if sensitive {
            let payload = OtpPayload::ProfileChange {
                new_email,
                new_password_hash,
                delete_account: request.delete_account,
            };
            deliver_otp(
                &resources,
                user.id,
                &user.email,
                OtpContext::ProfileUpdate,
                payload,
            )
            .await?;
            info!(user_id = %user.id, "Sensitive profile change awaiting confirmation");
        }

        if let Some(name) = new_name {
            user = users
                .update_user(
                    user.id,
                    &UserUpdate {
                        full_name: Some(name.to_owned()),
                        ..UserUpdate::default()
                    },
                )
                .await?;
        }

        let message = if sensitive {
            messages::PROFILE_OTP_REQUIRED
        } else {
            messages::PROFILE_UPDATED
        };
        Ok(Json(UpdateProfileResponse {
            success: true,
            otp_required: sensitive,
            message: message.to_owned(),
            user: user.to_public(),
        })
        .into_response())
    }

    /// Current session user
    async fn me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;
        Ok(Json(json!({ "success": true, "user": user.to_public() })).into_response())
    }

    /// Send the browser to Google's consent page
    async fn google_redirect(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let client = resources
            .google
            .as_ref()
            .ok_or_else(|| AppError::not_found("Google sign-in"))?;

        let state = GoogleOAuthClient::generate_state();
        let location = client.authorization_url(&state)?;

        let mut headers = HeaderMap::new();
        append_set_cookie(
            &mut headers,
            &resources
                .cookie_policy
                .http_only_cookie(OAUTH_STATE_COOKIE, &state, OAUTH_STATE_TTL_SECS),
        );
        Ok(redirect(headers, &location))
    }

    /// Finish Google sign-in; failures redirect to the login page
    async fn google_callback(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<OAuthCallbackQuery>,
    ) -> Response {
        let frontend = resources.config.frontend_url.trim_end_matches('/').to_owned();
        let mut response_headers = HeaderMap::new();
        append_set_cookie(
            &mut response_headers,
            &resources.cookie_policy.clear_cookie(OAUTH_STATE_COOKIE),
        );

        match Self::complete_google_login(&resources, &headers, &query).await {
            Ok(user) => match session_cookie(&resources, &user) {
                Ok(cookie) => {
                    append_set_cookie(&mut response_headers, &cookie);
                    info!(user_id = %user.id, "Google sign-in complete");
                    redirect(
                        response_headers,
                        &format!("{frontend}/clothify?auth=success&source=google"),
                    )
                }
                Err(e) => oauth_failure(response_headers, &frontend, &e),
            },
            Err(e) => oauth_failure(response_headers, &frontend, &e),
        }
    }

    async fn complete_google_login(
        resources: &ServerResources,
        headers: &HeaderMap,
        query: &OAuthCallbackQuery,
    ) -> AppResult<User> {
        let client = resources
            .google
            .as_ref()
            .ok_or_else(|| AppError::not_found("Google sign-in"))?;

        if let Some(error) = &query.error {
            return Err(AppError::auth_invalid(format!("Google sign-in denied: {error}")));
        }

        let expected = get_cookie_value(headers, OAUTH_STATE_COOKIE);
        match (&query.state, expected) {
            (Some(state), Some(expected)) if *state == expected => {}
            _ => return Err(AppError::auth_invalid("OAuth state mismatch")),
        }

        let code = query
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AppError::missing_field("Missing authorization code"))?;

        let profile = client.fetch_profile(code).await?;
        find_or_create_google_user(resources, &profile).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Password as typed; only an all-whitespace value counts as missing
fn raw_password<'a>(value: Option<&'a str>, message: &str) -> AppResult<&'a str> {
    value
        .filter(|password| !password.trim().is_empty())
        .ok_or_else(|| AppError::missing_field(message))
}

fn parse_user_id(raw: Option<&str>) -> AppResult<Uuid> {
    let raw = required(raw, messages::ALL_FIELDS_REQUIRED)?;
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(messages::INVALID_USER_ID))
}

fn parse_context(raw: Option<&str>) -> AppResult<OtpContext> {
    raw.map(str::trim)
        .filter(|context| !context.is_empty())
        .map_or(Ok(OtpContext::Signup), |context| {
            context
                .parse()
                .map_err(|_| AppError::invalid_input(messages::INVALID_OTP_CONTEXT))
        })
}

/// Issue a ticket and mail its code; the ticket is dropped if mail fails
pub(crate) async fn deliver_otp(
    resources: &ServerResources,
    user_id: Uuid,
    to: &str,
    context: OtpContext,
    payload: OtpPayload,
) -> AppResult<()> {
    let issued = resources.otp_store.issue(user_id, context, payload).await?;
    send_or_discard(resources, user_id, to, context, &issued.code).await
}

async fn send_or_discard(
    resources: &ServerResources,
    user_id: Uuid,
    to: &str,
    context: OtpContext,
    code: &str,
) -> AppResult<()> {
    if let Err(e) = resources
        .mailer
        .send(OutgoingMail::otp(to, context, code))
        .await
    {
        resources.otp_store.discard(user_id).await;
        return Err(e);
    }
    Ok(())
}

/// Apply a confirmed profile change
async fn apply_profile_change(
    resources: &ServerResources,
    user: &User,
    payload: OtpPayload,
) -> Result<Response, AppError> {
    let OtpPayload::ProfileChange {
        new_email,
        new_password_hash,
        delete_account,
    } = payload
    else {
        return Err(AppError::invalid_input(messages::NO_PENDING_CHANGE));
    };

    let users = resources.database.users();
    if delete_account {
        users.delete_user(user.id).await?;
        let mut headers = HeaderMap::new();
        append_set_cookie(
            &mut headers,
            &resources.cookie_policy.clear_cookie(SESSION_COOKIE),
        );
        info!(user_id = %user.id, "Account deleted");
        return Ok((
            headers,
            Json(json!({ "success": true, "message": messages::ACCOUNT_DELETED })),
        )
            .into_response());
    }

    if let Some(email) = &new_email {
        if users
            .get_user_by_email(email)
            .await?
            .is_some_and(|other| other.id != user.id)
        {
            return Err(AppError::already_exists(messages::EMAIL_IN_USE));
        }
    }

    let updated = users
        .update_user(
            user.id,
            &UserUpdate {
                email: new_email,
                password_hash: new_password_hash,
                ..UserUpdate::default()
            },
        )
        .await?;

    // The token carries the email, so a changed address needs a fresh session
    let headers = session_headers(resources, &updated)?;
    info!(user_id = %updated.id, "Profile change applied");
    Ok((
        headers,
        Json(json!({
            "success": true,
            "message": messages::PROFILE_UPDATED,
            "user": updated.to_public(),
        })),
    )
        .into_response())
}

async fn find_or_create_google_user(
    resources: &ServerResources,
    profile: &GoogleProfile,
) -> AppResult<User> {
    let email = profile
        .email
        .as_deref()
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::auth_invalid("Google account has no email address"))?;

    let users = resources.database.users();
    if let Some(user) = users.get_user_by_email(&email).await? {
        if user.google_id.is_some() && user.is_verified {
            return Ok(user);
        }
        return users
            .update_user(
                user.id,
                &UserUpdate {
                    google_id: user.google_id.is_none().then(|| profile.id.clone()),
                    is_verified: Some(true),
                    ..UserUpdate::default()
                },
            )
            .await;
    }

    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(OAUTH_PASSWORD_LENGTH)
        .map(char::from)
        .collect();

    let display_name = profile.display_name();
    let name = if display_name.trim().is_empty() {
        email.split('@').next().unwrap_or_default().to_owned()
    } else {
        display_name
    };

    let mut user = User::new(&email, &name, AuthManager::hash_password(&password)?);
    user.profile_pic = profile
        .picture
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| default_avatar_url(&email));
    user.is_verified = true;
    user.google_id = Some(profile.id.clone());

    users.create_user(&user).await?;
    info!(user_id = %user.id, "Account created through Google sign-in");
    Ok(user)
}

fn session_cookie(resources: &ServerResources, user: &User) -> AppResult<String> {
    let token = resources.auth_manager.generate_token(user)?;
    Ok(resources
        .cookie_policy
        .session_cookie(&token, resources.auth_manager.token_ttl().num_seconds()))
}

/// Response headers that start a session for `user`
fn session_headers(resources: &ServerResources, user: &User) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    append_set_cookie(&mut headers, &session_cookie(resources, user)?);
    Ok(headers)
}

fn redirect(mut headers: HeaderMap, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(header::LOCATION, value);
            (StatusCode::FOUND, headers).into_response()
        }
        Err(e) => AppError::internal(format!("Invalid redirect location: {e}")).into_response(),
    }
}

fn oauth_failure(headers: HeaderMap, frontend: &str, error: &AppError) -> Response {
    warn!(code = ?error.code, "Google sign-in failed: {}", error.message);
    redirect(
        headers,
        &format!(
            "{frontend}/login?error=true&code=OAUTH_FAILURE&message={}",
            urlencoding::encode(&error.message)
        ),
    )
}
