// ABOUTME: Database operations for the flat per-user chat log
// ABOUTME: Sequence numbers are allocated inside the insert statement so concurrent writers never collide
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use super::{from_db_timestamp, parse_uuid, to_db_timestamp};
use chrono::Utc;
use clothify_core::errors::{AppError, AppResult};
use clothify_core::models::ChatLog;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Chat log database operations manager
pub struct ChatLogManager {
    pool: SqlitePool,
}

impl ChatLogManager {
    /// Create a new chat log manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an exchange with the next sequence number for this user
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn append(&self, user_id: Uuid, input: &str, response: &str) -> AppResult<ChatLog> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let sno: i64 = sqlx::query_scalar(
            r"
            INSERT INTO chat_logs (id, user_id, sno, input, response, created_at)
            SELECT $1, $2, COALESCE(MAX(sno), 0) + 1, $3, $4, $5
            FROM chat_logs WHERE user_id = $2
            RETURNING sno
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(input)
        .bind(response)
        .bind(to_db_timestamp(now))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to append chat log: {e}")))?;

        Ok(ChatLog {
            id,
            user_id,
            sno,
            input: input.to_owned(),
            response: response.to_owned(),
            created_at: now,
        })
    }

    /// All exchanges for a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<ChatLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, sno, input, response, created_at
            FROM chat_logs
            WHERE user_id = $1
            ORDER BY created_at DESC, sno DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list chat logs: {e}")))?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let owner: String = row.get("user_id");
                let created_at: String = row.get("created_at");
                Ok(ChatLog {
                    id: parse_uuid(&id)?,
                    user_id: parse_uuid(&owner)?,
                    sno: row.get("sno"),
                    input: row.get("input"),
                    response: row.get("response"),
                    created_at: from_db_timestamp(&created_at)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_support::{memory_db, seeded_user};
    use crate::database::Database;
    use clothify_core::models::User;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_sequence_numbers_are_per_user() {
        let db = memory_db().await;
        let a = seeded_user(&db, "a@example.com").await;
        let b = seeded_user(&db, "b@example.com").await;
        let logs = db.chat_logs();

        assert_eq!(logs.append(a.id, "hi", "hello").await.unwrap().sno, 1);
        assert_eq!(logs.append(a.id, "more", "sure").await.unwrap().sno, 2);
        assert_eq!(logs.append(b.id, "hey", "yo").await.unwrap().sno, 1);

        let listed = logs.list_for_user(a.id).await.unwrap();
        assert_eq!(listed.iter().map(|l| l.sno).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_sequence_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("logs.db").display());
        let db = Database::new(&url).await.unwrap();
        let user = User::new("race@example.com", "Racer", "hash".to_owned());
        db.users().create_user(&user).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..10 {
            let db = db.clone();
            let user_id = user.id;
            handles.push(tokio::spawn(async move {
                db.chat_logs()
                    .append(user_id, &format!("q{i}"), "a")
                    .await
                    .unwrap()
                    .sno
            }));
        }

        let mut seen = BTreeSet::new();
        for handle in handles {
            seen.insert(handle.await.unwrap());
        }
        assert_eq!(seen, (1..=10).collect());
    }
}
