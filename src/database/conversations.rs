// ABOUTME: Database operations for conversation threads and their messages
// ABOUTME: Enforces ownership, derives titles and sweeps abandoned single-message threads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use super::{from_db_timestamp, parse_uuid, to_db_timestamp};
use chrono::{DateTime, Duration, Utc};
use clothify_core::constants::{messages, time};
use clothify_core::errors::{AppError, AppResult};
use clothify_core::models::{derive_title, Conversation, ConversationMessage, ConversationRole};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

/// Conversation database operations manager
pub struct ConversationManager {
    pool: SqlitePool,
}

impl ConversationManager {
    /// Create a new conversation manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a conversation seeded with a first message
    ///
    /// The title is derived from that message.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub async fn create_conversation(
        &self,
        user_id: Uuid,
        role: ConversationRole,
        content: &str,
    ) -> AppResult<Conversation> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let title = derive_title(content);
        let stamp = to_db_timestamp(now);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO conversations (id, user_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&title)
        .bind(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create conversation: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO conversation_messages (conversation_id, role, content, timestamp)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id.to_string())
        .bind(role.as_str())
        .bind(content)
        .bind(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to add first message: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit conversation: {e}")))?;

        Ok(Conversation {
            id,
            user_id,
            title,
            messages: vec![ConversationMessage {
                role,
                content: content.to_owned(),
                timestamp: now,
            }],
            created_at: now,
            updated_at: now,
        })
    }

    /// List a user's conversations, newest activity first
    ///
    /// Abandoned threads are swept before the listing is read.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep or the query fails
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Conversation>> {
        let cutoff = Utc::now() - Duration::seconds(time::ABANDONED_CONVERSATION_SECS);
        self.sweep_abandoned(user_id, cutoff).await?;

        let rows = sqlx::query(
            r"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE user_id = $1
            ORDER BY updated_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list conversations: {e}")))?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut conversation = row_to_conversation(row)?;
            conversation.messages = self.load_messages(conversation.id).await?;
            conversations.push(conversation);
        }
        Ok(conversations)
    }

    /// Delete a user's threads holding exactly one message whose last
    /// activity is older than `cutoff`
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn sweep_abandoned(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM conversations
            WHERE user_id = $1
              AND updated_at < $2
              AND (SELECT COUNT(*) FROM conversation_messages m
                   WHERE m.conversation_id = conversations.id) = 1
            ",
        )
        .bind(user_id.to_string())
        .bind(to_db_timestamp(cutoff))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to sweep conversations: {e}")))?;

        let swept = result.rows_affected();
        if swept > 0 {
            debug!(user_id = %user_id, swept, "Removed abandoned conversations");
        }
        Ok(swept)
    }

    /// Load a conversation and check that `user_id` owns it
    ///
    /// An unparseable or unknown id is reported as not found; a thread owned
    /// by someone else is forbidden.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied` or a database error
    pub async fn get_owned_conversation(
        &self,
        conversation_id: &str,
        user_id: Uuid,
    ) -> AppResult<Conversation> {
        let id = Uuid::parse_str(conversation_id).map_err(|_| AppError::not_found("Conversation"))?;

        let row = sqlx::query(
            r"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get conversation: {e}")))?
        .ok_or_else(|| AppError::not_found("Conversation"))?;

        let mut conversation = row_to_conversation(&row)?;
        if conversation.user_id != user_id {
            return Err(AppError::permission_denied(messages::CONVERSATION_FORBIDDEN));
        }
        conversation.messages = self.load_messages(conversation.id).await?;
        Ok(conversation)
    }

    /// Append a message to an owned conversation
    ///
    /// When a user message brings the thread to exactly two messages the
    /// title is re-derived from it.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied` or a database error
    pub async fn append_message(
        &self,
        conversation_id: &str,
        user_id: Uuid,
        role: ConversationRole,
        content: &str,
    ) -> AppResult<Conversation> {
        let conversation = self.get_owned_conversation(conversation_id, user_id).await?;
        let id = conversation.id.to_string();
        let stamp = to_db_timestamp(Utc::now());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO conversation_messages (conversation_id, role, content, timestamp)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&id)
        .bind(role.as_str())
        .bind(content)
        .bind(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to append message: {e}")))?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM conversation_messages WHERE conversation_id = $1",
        )
        .bind(&id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to count messages: {e}")))?;

        if role == ConversationRole::User && count == 2 {
            sqlx::query("UPDATE conversations SET title = $2, updated_at = $3 WHERE id = $1")
                .bind(&id)
                .bind(derive_title(content))
                .bind(&stamp)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to retitle conversation: {e}")))?;
        } else {
            sqlx::query("UPDATE conversations SET updated_at = $2 WHERE id = $1")
                .bind(&id)
                .bind(&stamp)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to touch conversation: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit message: {e}")))?;

        self.get_owned_conversation(conversation_id, user_id).await
    }

    /// Delete an owned conversation and its messages
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied` or a database error
    pub async fn delete_conversation(&self, conversation_id: &str, user_id: Uuid) -> AppResult<()> {
        let conversation = self.get_owned_conversation(conversation_id, user_id).await?;

        sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(conversation.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete conversation: {e}")))?;

        Ok(())
    }

    async fn load_messages(&self, conversation_id: Uuid) -> AppResult<Vec<ConversationMessage>> {
        let rows = sqlx::query(
            r"
            SELECT role, content, timestamp
            FROM conversation_messages
            WHERE conversation_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load messages: {e}")))?;

        rows.iter()
            .map(|row| {
                let role: String = row.get("role");
                let timestamp: String = row.get("timestamp");
                Ok(ConversationMessage {
                    role: role.parse().map_err(AppError::database)?,
                    content: row.get("content"),
                    timestamp: from_db_timestamp(&timestamp)?,
                })
            })
            .collect()
    }
}

fn row_to_conversation(row: &SqliteRow) -> AppResult<Conversation> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Ok(Conversation {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        title: row.get("title"),
        messages: Vec::new(),
        created_at: from_db_timestamp(&created_at)?,
        updated_at: from_db_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{memory_db, seeded_user};
    use clothify_core::errors::ErrorCode;

    #[tokio::test]
    async fn test_create_derives_title_from_first_message() {
        let db = memory_db().await;
        let user = seeded_user(&db, "c1@example.com").await;

        let conv = db
            .conversations()
            .create_conversation(user.id, ConversationRole::User, "  What to wear for Diwali?  ")
            .await
            .unwrap();

        assert_eq!(conv.title, "What to wear for Diwali?");
        assert_eq!(conv.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_second_user_message_retitles() {
        let db = memory_db().await;
        let user = seeded_user(&db, "c2@example.com").await;
        let convs = db.conversations();

        let conv = convs
            .create_conversation(user.id, ConversationRole::Assistant, "Namaste! How can I help?")
            .await
            .unwrap();
        let id = conv.id.to_string();

        let updated = convs
            .append_message(&id, user.id, ConversationRole::User, "Sangeet outfit for men")
            .await
            .unwrap();
        assert_eq!(updated.title, "Sangeet outfit for men");
        assert_eq!(updated.messages.len(), 2);

        let third = convs
            .append_message(&id, user.id, ConversationRole::User, "Something else entirely")
            .await
            .unwrap();
        assert_eq!(third.title, "Sangeet outfit for men");
        assert_eq!(third.messages[2].content, "Something else entirely");
    }

    #[tokio::test]
    async fn test_assistant_second_message_keeps_title() {
        let db = memory_db().await;
        let user = seeded_user(&db, "c3@example.com").await;
        let convs = db.conversations();

        let conv = convs
            .create_conversation(user.id, ConversationRole::User, "Office wear")
            .await
            .unwrap();
        let updated = convs
            .append_message(&conv.id.to_string(), user.id, ConversationRole::Assistant, "Try a blazer")
            .await
            .unwrap();
        assert_eq!(updated.title, "Office wear");
    }

    #[tokio::test]
    async fn test_foreign_and_unknown_conversations() {
        let db = memory_db().await;
        let owner = seeded_user(&db, "owner@example.com").await;
        let other = seeded_user(&db, "other@example.com").await;
        let convs = db.conversations();

        let conv = convs
            .create_conversation(owner.id, ConversationRole::User, "mine")
            .await
            .unwrap();

        let forbidden = convs
            .get_owned_conversation(&conv.id.to_string(), other.id)
            .await
            .unwrap_err();
        assert_eq!(forbidden.code, ErrorCode::PermissionDenied);
        assert_eq!(forbidden.message, messages::CONVERSATION_FORBIDDEN);

        let missing = convs
            .get_owned_conversation(&Uuid::new_v4().to_string(), owner.id)
            .await
            .unwrap_err();
        assert_eq!(missing.code, ErrorCode::ResourceNotFound);

        let garbage = convs.get_owned_conversation("not-an-id", owner.id).await.unwrap_err();
        assert_eq!(garbage.message, "Conversation not found");

        let delete = convs
            .delete_conversation(&conv.id.to_string(), other.id)
            .await
            .unwrap_err();
        assert_eq!(delete.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_stale_single_message_threads() {
        let db = memory_db().await;
        let user = seeded_user(&db, "sweep@example.com").await;
        let convs = db.conversations();

        let lonely = convs
            .create_conversation(user.id, ConversationRole::User, "hello?")
            .await
            .unwrap();
        let busy = convs
            .create_conversation(user.id, ConversationRole::User, "first")
            .await
            .unwrap();
        convs
            .append_message(&busy.id.to_string(), user.id, ConversationRole::Assistant, "reply")
            .await
            .unwrap();

        // Nothing is older than a cutoff in the past
        let past = Utc::now() - Duration::hours(1);
        assert_eq!(convs.sweep_abandoned(user.id, past).await.unwrap(), 0);

        let future = Utc::now() + Duration::seconds(1);
        assert_eq!(convs.sweep_abandoned(user.id, future).await.unwrap(), 1);

        let remaining = convs.list_for_user(user.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, busy.id);
        assert!(convs
            .get_owned_conversation(&lonely.id.to_string(), user.id)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_list_orders_by_recent_activity() {
        let db = memory_db().await;
        let user = seeded_user(&db, "order@example.com").await;
        let convs = db.conversations();

        let older = convs
            .create_conversation(user.id, ConversationRole::User, "older")
            .await
            .unwrap();
        let newer = convs
            .create_conversation(user.id, ConversationRole::User, "newer")
            .await
            .unwrap();
        convs
            .append_message(&older.id.to_string(), user.id, ConversationRole::Assistant, "bump")
            .await
            .unwrap();

        let listed = convs.list_for_user(user.id).await.unwrap();
        assert_eq!(listed[0].id, older.id);
        assert_eq!(listed[1].id, newer.id);
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let db = memory_db().await;
        let user = seeded_user(&db, "cascade@example.com").await;
        let conv = db
            .conversations()
            .create_conversation(user.id, ConversationRole::User, "bye")
            .await
            .unwrap();

        db.users().delete_user(user.id).await.unwrap();
        let err = db
            .conversations()
            .get_owned_conversation(&conv.id.to_string(), user.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    }
}
