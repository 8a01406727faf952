// ABOUTME: User account record and its client-facing projection
// ABOUTME: Password hashes never leave the persistence layer through PublicUser
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base URL of the generated avatar service used when no photo is known
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/9.x/avataaars/svg";

/// Build the default avatar URL seeded by the account email
#[must_use]
pub fn default_avatar_url(email: &str) -> String {
    format!("{AVATAR_BASE_URL}?seed={email}")
}

/// Account record as stored in the `users` table
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Lower-cased, unique email address
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Display name
    pub full_name: String,
    /// Profile picture URL
    pub profile_pic: String,
    /// Whether the email address has been confirmed
    pub is_verified: bool,
    /// Google account subject when the user signed in through OAuth
    pub google_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new, unsaved user with a fresh ID and the default avatar
    #[must_use]
    pub fn new(email: &str, full_name: &str, password_hash: String) -> Self {
        let now = Utc::now();
        let email = email.trim().to_lowercase();
        Self {
            id: Uuid::new_v4(),
            profile_pic: default_avatar_url(&email),
            email,
            password_hash,
            full_name: full_name.trim().to_owned(),
            is_verified: false,
            google_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Client-facing projection of this user
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

/// User fields returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// User ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Profile picture URL
    pub profile_pic: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            profile_pic: user.profile_pic.clone(),
        }
    }
}
