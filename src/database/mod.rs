// ABOUTME: SQLite connection management and schema setup for Clothify
// ABOUTME: Hands out per-table managers sharing one sqlx connection pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Database Management
//!
//! Users, conversations and chat logs live in SQLite. The schema is created
//! idempotently at startup; each table family has a small manager type that
//! owns a clone of the pool.

mod chat_logs;
mod conversations;
mod users;

pub use chat_logs::ChatLogManager;
pub use conversations::ConversationManager;
pub use users::{UserManager, UserUpdate};

use chrono::{DateTime, SecondsFormat, Utc};
use clothify_core::errors::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 8;

/// Database handle shared by all request handlers
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and create the schema
    ///
    /// In-memory URLs get a single-connection pool, because every SQLite
    /// memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or the
    /// schema cannot be created
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let in_memory = database_url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { MAX_CONNECTIONS };

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(max_connections, "Database ready");
        Ok(db)
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// User table operations
    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(self.pool.clone())
    }

    /// Conversation table operations
    #[must_use]
    pub fn conversations(&self) -> ConversationManager {
        ConversationManager::new(self.pool.clone())
    }

    /// Chat log table operations
    #[must_use]
    pub fn chat_logs(&self) -> ChatLogManager {
        ChatLogManager::new(self.pool.clone())
    }

    /// Create all tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_conversations().await?;
        self.migrate_chat_logs().await?;
        Ok(())
    }

    async fn migrate_users(&self) -> AppResult<()> {
        self.execute_ddl(
            "users",
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                full_name TEXT NOT NULL,
                profile_pic TEXT NOT NULL,
                is_verified INTEGER NOT NULL DEFAULT 0,
                google_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .await
    }

    async fn migrate_conversations(&self) -> AppResult<()> {
        self.execute_ddl(
            "conversations",
            r"
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .await?;
        self.execute_ddl(
            "conversation_messages",
            r"
            CREATE TABLE IF NOT EXISTS conversation_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id TEXT NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
                role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            ",
        )
        .await?;
        self.execute_ddl(
            "idx_conversations_user",
            "CREATE INDEX IF NOT EXISTS idx_conversations_user ON conversations(user_id, updated_at)",
        )
        .await?;
        self.execute_ddl(
            "idx_conversation_messages_conversation",
            "CREATE INDEX IF NOT EXISTS idx_conversation_messages_conversation ON conversation_messages(conversation_id, id)",
        )
        .await
    }

    async fn migrate_chat_logs(&self) -> AppResult<()> {
        self.execute_ddl(
            "chat_logs",
            r"
            CREATE TABLE IF NOT EXISTS chat_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                sno INTEGER NOT NULL,
                input TEXT NOT NULL,
                response TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (user_id, sno)
            )
            ",
        )
        .await
    }

    async fn execute_ddl(&self, name: &str, statement: &str) -> AppResult<()> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create {name}: {e}")))?;
        Ok(())
    }
}

/// Fixed-width UTC timestamp so that text ordering matches time ordering
pub(crate) fn to_db_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a timestamp written by [`to_db_timestamp`]
pub(crate) fn from_db_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid stored timestamp '{raw}': {e}")))
}

/// Parse a stored UUID column
pub(crate) fn parse_uuid(raw: &str) -> AppResult<uuid::Uuid> {
    uuid::Uuid::parse_str(raw)
        .map_err(|e| AppError::database(format!("Invalid stored id '{raw}': {e}")))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_timestamps_sort_lexicographically() {
        let earlier = DateTime::parse_from_rfc3339("2025-03-01T10:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2025-03-01T10:00:01Z")
            .unwrap()
            .with_timezone(&Utc);

        assert!(to_db_timestamp(earlier) < to_db_timestamp(later));
        assert_eq!(from_db_timestamp(&to_db_timestamp(earlier)).unwrap(), earlier);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = test_support::memory_db().await;
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }
}
