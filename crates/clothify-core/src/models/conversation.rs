// ABOUTME: Conversation thread and message types for database persistence
// ABOUTME: Titles are derived from the opening user message of the thread
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of characters kept from a message when deriving a title
pub const TITLE_MAX_CHARS: usize = 50;

/// Title used when the source message is blank
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

/// Derive a conversation title from a message body
#[must_use]
pub fn derive_title(content: &str) -> String {
    let title: String = content.trim().chars().take(TITLE_MAX_CHARS).collect();
    if title.is_empty() {
        DEFAULT_CONVERSATION_TITLE.to_owned()
    } else {
        title
    }
}

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    /// Written by the end user
    User,
    /// Written by the assistant
    Assistant,
}

impl ConversationRole {
    /// Lower-case storage form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ConversationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("unknown conversation role: {other}")),
        }
    }
}

/// A single message inside a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Message author
    pub role: ConversationRole,
    /// Message text
    pub content: String,
    /// When the message was appended
    pub timestamp: DateTime<Utc>,
}

/// A conversation thread owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Derived title
    pub title: String,
    /// Messages in append order
    pub messages: Vec<ConversationMessage>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of the last append or retitle
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed_prefix() {
        let long = format!("   {}   ", "a".repeat(80));
        assert_eq!(derive_title(&long).chars().count(), TITLE_MAX_CHARS);
        assert_eq!(derive_title("  linen kurta ideas "), "linen kurta ideas");
    }

    #[test]
    fn test_blank_title_falls_back() {
        assert_eq!(derive_title("   \n "), DEFAULT_CONVERSATION_TITLE);
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let hindi = "क".repeat(60);
        assert_eq!(derive_title(&hindi).chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_role_round_trips_through_storage_form() {
        assert_eq!("assistant".parse::<ConversationRole>(), Ok(ConversationRole::Assistant));
        assert!("system".parse::<ConversationRole>().is_err());
    }
}
