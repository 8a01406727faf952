// ABOUTME: Conversation route handlers for listing, creating, reading, appending to and deleting threads
// ABOUTME: Every handler requires a session and only ever touches the caller's own conversations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! Conversation routes
//!
//! Conversations are returned as raw documents, not wrapped in an envelope,
//! to match what the chat frontend stores locally.

use crate::middleware::require_user;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clothify_core::constants::messages;
use clothify_core::errors::{AppError, AppResult};
use clothify_core::models::ConversationRole;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Message body inside conversation requests
#[derive(Debug, Default, Deserialize)]
pub struct MessageInput {
    /// `user` or `assistant`, `user` when omitted
    pub role: Option<String>,
    /// Message text
    pub content: Option<String>,
}

impl MessageInput {
    fn parse(&self, missing_content: &str) -> AppResult<(ConversationRole, &str)> {
        let content = self
            .content
            .as_deref()
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::missing_field(missing_content))?;
        let role = match self.role.as_deref() {
            None | Some("") => ConversationRole::User,
            Some(role) => role
                .parse()
                .map_err(|_| AppError::invalid_input(messages::INVALID_MESSAGE_ROLE))?,
        };
        Ok((role, content))
    }
}

/// Request to start a conversation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    /// First message
    #[serde(default)]
    pub initial_message: MessageInput,
}

/// Request to append a message
#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    /// Appended message
    #[serde(default)]
    pub message: MessageInput,
}

/// Conversation routes handler
pub struct ConversationRoutes;

impl ConversationRoutes {
    /// Create all conversation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/conversations",
                get(Self::list_conversations).post(Self::create_conversation),
            )
            .route(
                "/conversations/:conversation_id",
                get(Self::get_conversation).delete(Self::delete_conversation),
            )
            .route(
                "/conversations/:conversation_id/messages",
                post(Self::add_message),
            )
            .with_state(resources)
    }

    /// List the caller's conversations after sweeping abandoned ones
    async fn list_conversations(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;
        let conversations = resources
            .database
            .conversations()
            .list_for_user(user.id)
            .await?;
        Ok(Json(conversations).into_response())
    }

    /// Start a conversation with its first message
    async fn create_conversation(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateConversationRequest>,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;
        let (role, content) = request
            .initial_message
            .parse(messages::INITIAL_MESSAGE_REQUIRED)?;

        let conversation = resources
            .database
            .conversations()
            .create_conversation(user.id, role, content)
            .await?;

        info!(user_id = %user.id, conversation_id = %conversation.id, "Conversation created");
        Ok((StatusCode::CREATED, Json(conversation)).into_response())
    }

    /// Fetch one owned conversation
    async fn get_conversation(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(conversation_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;
        let conversation = resources
            .database
            .conversations()
            .get_owned_conversation(&conversation_id, user.id)
            .await?;
        Ok(Json(conversation).into_response())
    }

    /// Append a message to an owned conversation
    async fn add_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(conversation_id): Path<String>,
        Json(request): Json<AddMessageRequest>,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;
        let (role, content) = request.message.parse(messages::MESSAGE_CONTENT_REQUIRED)?;

        let conversation = resources
            .database
            .conversations()
            .append_message(&conversation_id, user.id, role, content)
            .await?;
        Ok(Json(conversation).into_response())
    }

    /// Delete an owned conversation
    async fn delete_conversation(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(conversation_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = require_user(&resources, &headers).await?;
        resources
            .database
            .conversations()
            .delete_conversation(&conversation_id, user.id)
            .await?;

        info!(user_id = %user.id, conversation_id = %conversation_id, "Conversation deleted");
        Ok(Json(json!({ "message": messages::CONVERSATION_DELETED })).into_response())
    }
}
