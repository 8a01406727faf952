// ABOUTME: Assistant route handlers for the stylist chat endpoint and the chat log history
// ABOUTME: Authenticated exchanges are appended to the caller's chat log on a best-effort basis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! Assistant routes
//!
//! `/ai/clothify` never leaks provider errors: anything past validation turns
//! into the generic technical-issue reply.

use crate::llm::{ChatMessage, MessageRole};
use crate::middleware::{optional_user_id, require_user};
use crate::resources::ServerResources;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clothify_core::constants::messages;
use clothify_core::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// One message as sent by the chat widget
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// `user`, `assistant` or `system`; anything else counts as `user`
    #[serde(default)]
    pub role: String,
    /// Message text
    #[serde(default)]
    pub content: String,
}

/// Assistant request
#[derive(Debug, Default, Deserialize)]
pub struct AssistantRequest {
    /// Conversation so far, oldest first
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
}

impl AssistantRequest {
    /// Non-empty message list from a raw body; anything else is `None`
    fn from_body(body: Result<Json<Value>, JsonRejection>) -> Option<Self> {
        let Ok(Json(body)) = body else {
            return None;
        };
        let messages = body.get("messages").filter(|value| value.is_array())?.clone();
        let messages: Vec<IncomingMessage> = serde_json::from_value(messages).ok()?;
        (!messages.is_empty()).then_some(Self { messages })
    }
}

/// Assistant reply
#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantResponse {
    /// Cleaned reply text
    pub suggestion: String,
}

fn to_chat_message(message: &IncomingMessage) -> ChatMessage {
    let role = match message.role.as_str() {
        "assistant" => MessageRole::Assistant,
        "system" => MessageRole::System,
        _ => MessageRole::User,
    };
    ChatMessage::new(role, message.content.clone())
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Assistant routes handler
pub struct AssistantRoutes;

impl AssistantRoutes {
    /// Create assistant and chat history routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ai/clothify", post(Self::suggest))
            .route("/chats", get(Self::list_chats))
            .with_state(resources)
    }

    /// Produce a stylist reply
    async fn suggest(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<Value>, JsonRejection>,
    ) -> Response {
        let Some(request) = AssistantRequest::from_body(body) else {
            return error_body(StatusCode::BAD_REQUEST, messages::EMPTY_MESSAGES);
        };

        let history: Vec<ChatMessage> = request.messages.iter().map(to_chat_message).collect();
        let suggestion = match resources.stylist.respond(&history).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                error!(code = ?e.code, "Assistant request failed: {}", e.message);
                return error_body(StatusCode::INTERNAL_SERVER_ERROR, messages::TECHNICAL_ISSUE);
            }
        };

        if let Some(user_id) = optional_user_id(&resources, &headers) {
            let input = request
                .messages
                .last()
                .map_or("", |message| message.content.as_str());
            match resources
                .database
                .chat_logs()
                .append(user_id, input, &suggestion)
                .await
            {
                Ok(log) => info!(user_id = %user_id, sno = log.sno, "Chat exchange saved"),
                Err(e) => warn!(user_id = %user_id, "Failed to save chat exchange: {}", e.message),
            }
        }

        Json(AssistantResponse { suggestion }).into_response()
    }

    /// Saved exchanges of the session user, newest first
    async fn list_chats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;
        let chats = resources.database.chat_logs().list_for_user(user.id).await?;
        Ok(Json(json!({ "success": true, "chats": chats })).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_roles_become_user() {
        let message = IncomingMessage {
            role: "tool".to_owned(),
            content: "hi".to_owned(),
        };
        assert_eq!(to_chat_message(&message).role, MessageRole::User);

        let message = IncomingMessage {
            role: "assistant".to_owned(),
            content: "hello".to_owned(),
        };
        assert_eq!(to_chat_message(&message).role, MessageRole::Assistant);
    }

    #[test]
    fn test_only_non_empty_message_arrays_are_accepted() {
        for body in [
            json!({}),
            json!({ "messages": [] }),
            json!({ "messages": "hi" }),
            json!({ "messages": null }),
            json!({ "messages": { "role": "user" } }),
        ] {
            assert!(AssistantRequest::from_body(Ok(Json(body))).is_none());
        }

        let request = AssistantRequest::from_body(Ok(Json(json!({
            "messages": [{ "role": "user", "content": "kurta for diwali?" }]
        }))))
        .unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "kurta for diwali?");
    }
}
