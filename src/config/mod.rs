// ABOUTME: Configuration module for the Clothify server
// ABOUTME: Environment-driven settings for database, secrets, LLM, mail and OAuth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

/// Environment variable parsing into `ServerConfig`
pub mod environment;

pub use environment::{
    Environment, GoogleOAuthConfig, LlmConfig, MailConfig, RateLimitConfig, ServerConfig,
};
