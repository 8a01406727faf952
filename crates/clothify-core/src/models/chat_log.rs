// ABOUTME: Flat per-user log of completed assistant exchanges
// ABOUTME: Sequence numbers are assigned by the database at insert time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One `{input, response}` exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLog {
    /// Record ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Per-user sequence number, starting at 1
    pub sno: i64,
    /// Last user message of the request
    pub input: String,
    /// Cleaned assistant reply
    pub response: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}
