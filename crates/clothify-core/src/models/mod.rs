// ABOUTME: Core data models for the Clothify assistant
// ABOUTME: Re-exports user, conversation and chat log records shared across crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Data Models
//!
//! Persisted records and the public projections returned by the HTTP API.
//!
//! - `User`: account record, with `PublicUser` as its client-facing shape
//! - `Conversation`: an owned, append-only thread of `ConversationMessage`s
//! - `ChatLog`: legacy flat log of `{input, response}` exchanges numbered per user

mod chat_log;
mod conversation;
mod user;

pub use chat_log::ChatLog;
pub use conversation::{
    derive_title, Conversation, ConversationMessage, ConversationRole, DEFAULT_CONVERSATION_TITLE,
    TITLE_MAX_CHARS,
};
pub use user::{default_avatar_url, PublicUser, User};
