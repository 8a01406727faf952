// ABOUTME: Contact form and support request handlers that forward visitor messages by mail
// ABOUTME: Both share validation; they differ in recipient, subject and rate bucket
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use crate::mailer::OutgoingMail;
use crate::resources::ServerResources;
use crate::validation::validate_email;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use clothify_core::constants::messages;
use clothify_core::errors::{AppError, AppResult};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Contact form submission
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    /// Reply address
    pub email: Option<String>,
    /// Optional subject line
    pub subject: Option<String>,
    /// Message body
    pub message: Option<String>,
}

/// Support request submission
#[derive(Debug, Deserialize)]
pub struct SupportRequest {
    /// Sender name
    pub name: Option<String>,
    /// Reply address
    pub email: Option<String>,
    /// Message body
    pub message: Option<String>,
}

/// Email and body, both required; the email must be well formed
fn sender_and_body<'a>(
    email: Option<&'a str>,
    message: Option<&'a str>,
) -> AppResult<(&'a str, &'a str)> {
    let email = email.map(str::trim).filter(|email| !email.is_empty());
    let message = message.filter(|message| !message.trim().is_empty());
    let (Some(email), Some(message)) = (email, message) else {
        return Err(AppError::missing_field(messages::EMAIL_AND_MESSAGE_REQUIRED));
    };
    validate_email(email)?;
    Ok((email, message))
}

fn support_body(name: Option<&str>, email: &str, message: &str) -> String {
    match name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("From: {name} <{email}>\n\n{message}"),
        None => format!("From: {email}\n\n{message}"),
    }
}

/// Deliver and translate the outcome into the form's response shape
async fn forward(resources: &ServerResources, mail: OutgoingMail, success: &str) -> Response {
    let to = mail.to.clone();
    match resources.mailer.send(mail).await {
        Ok(()) => {
            info!(to = %to, "Visitor message forwarded");
            Json(json!({ "success": true, "message": success })).into_response()
        }
        Err(e) => {
            error!(to = %to, "Failed to forward visitor message: {}", e.message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": messages::MESSAGE_FAILED })),
            )
                .into_response()
        }
    }
}

/// Contact form handler
pub struct ContactRoutes;

impl ContactRoutes {
    /// `/message` route
    pub fn message_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/message", post(Self::send_message))
            .with_state(resources)
    }

    /// `/support` route
    pub fn support_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/support", post(Self::send_support))
            .with_state(resources)
    }

    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ContactRequest>,
    ) -> Result<Response, AppError> {
        let (email, message) =
            sender_and_body(request.email.as_deref(), request.message.as_deref())?;
        let subject = request
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|subject| !subject.is_empty())
            .unwrap_or(messages::CONTACT_DEFAULT_SUBJECT);

        let mail = OutgoingMail::text(
            resources.config.owner_email.clone(),
            subject,
            format!("From: {email}\n\n{message}"),
        );
        Ok(forward(&resources, mail, messages::MESSAGE_SENT).await)
    }

    async fn send_support(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SupportRequest>,
    ) -> Result<Response, AppError> {
        let (email, message) =
            sender_and_body(request.email.as_deref(), request.message.as_deref())?;

        let mail = OutgoingMail::text(
            resources.config.support_email.clone(),
            messages::SUPPORT_SUBJECT,
            support_body(request.name.as_deref(), email, message),
        );
        Ok(forward(&resources, mail, messages::SUPPORT_SENT).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_and_body_requires_both() {
        let err = sender_and_body(Some("a@b.co"), Some("  ")).unwrap_err();
        assert_eq!(err.message, messages::EMAIL_AND_MESSAGE_REQUIRED);

        let err = sender_and_body(None, Some("hello")).unwrap_err();
        assert_eq!(err.message, messages::EMAIL_AND_MESSAGE_REQUIRED);

        let err = sender_and_body(Some("nope"), Some("hello")).unwrap_err();
        assert_eq!(err.message, messages::INVALID_EMAIL);

        assert_eq!(
            sender_and_body(Some(" a@b.co "), Some("hello")).unwrap(),
            ("a@b.co", "hello")
        );
    }

    #[test]
    fn test_support_body_names_the_sender_when_known() {
        assert_eq!(
            support_body(Some("Asha"), "a@b.co", "help"),
            "From: Asha <a@b.co>\n\nhelp"
        );
        assert_eq!(support_body(None, "a@b.co", "help"), "From: a@b.co\n\nhelp");
    }
}
