// ABOUTME: Database operations for user accounts
// ABOUTME: Handles account creation, lookup, profile updates, verification and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use super::{from_db_timestamp, parse_uuid, to_db_timestamp};
use chrono::Utc;
use clothify_core::constants::messages;
use clothify_core::errors::{AppError, AppResult};
use clothify_core::models::User;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, profile_pic, is_verified, google_id, created_at, updated_at";

/// Fields that may change on an existing user; `None` leaves a column untouched
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    /// New lower-cased email
    pub email: Option<String>,
    /// New display name
    pub full_name: Option<String>,
    /// New bcrypt hash
    pub password_hash: Option<String>,
    /// New verification flag
    pub is_verified: Option<bool>,
    /// Link a Google account
    pub google_id: Option<String>,
}

/// User database operations manager
pub struct UserManager {
    pool: SqlitePool,
}

impl UserManager {
    /// Create a new user manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email is taken, or a database error
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, password_hash, full_name, profile_pic, is_verified, google_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.profile_pic)
        .bind(user.is_verified)
        .bind(user.google_id.as_deref())
        .bind(to_db_timestamp(user.created_at))
        .bind(to_db_timestamp(user.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_email(e, messages::EMAIL_EXISTS))?;

        Ok(())
    }

    /// Fetch a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Fetch a user by email, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Apply a partial update and return the stored user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user is gone, `ResourceAlreadyExists`
    /// if the new email is taken, or a database error
    pub async fn update_user(&self, user_id: Uuid, update: &UserUpdate) -> AppResult<User> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                password_hash = COALESCE($4, password_hash),
                is_verified = COALESCE($5, is_verified),
                google_id = COALESCE($6, google_id),
                updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(update.email.as_deref())
        .bind(update.full_name.as_deref())
        .bind(update.password_hash.as_deref())
        .bind(update.is_verified)
        .bind(update.google_id.as_deref())
        .bind(to_db_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_email(e, messages::EMAIL_IN_USE))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }

        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Delete a user; conversations and chat logs cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete user: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_unique_email(error: sqlx::Error, message: &str) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::already_exists(message),
        _ => AppError::database(format!("Failed to write user: {error}")),
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Ok(User {
        id: parse_uuid(&id)?,
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        profile_pic: row.get("profile_pic"),
        is_verified: row.get("is_verified"),
        google_id: row.get("google_id"),
        created_at: from_db_timestamp(&created_at)?,
        updated_at: from_db_timestamp(&updated_at)?,
    })
}
