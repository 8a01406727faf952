// ABOUTME: Main library entry point for the Clothify assistant backend
// ABOUTME: Accounts with OTP verification, the fashion and skincare stylist, conversations and contact mail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

#![deny(unsafe_code)]

//! # Clothify
//!
//! HTTP backend for a fashion and skincare chat assistant with a desi voice.
//!
//! ## Architecture
//!
//! - **Stylist**: intent classification, prompt composition and an LLM call
//!   with model fallback
//! - **Accounts**: signup, login and profile changes confirmed by one-time
//!   codes sent by mail, plus Google sign-in
//! - **Persistence**: users, conversations and chat logs in SQLite
//! - **HTTP**: axum routes under `/api` behind CSRF, rate limiting, CORS and
//!   security headers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clothify::config::ServerConfig;
//! use clothify::resources::ServerResources;
//! use clothify::routes::build_router;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let (resources, _otp_store) = ServerResources::from_config(config).await?;
//! let app = build_router(Arc::new(resources));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

/// Session tokens and password hashing
pub mod auth;

/// Environment configuration
pub mod config;

/// `SQLite` persistence
pub mod database;

/// OpenAI-compatible chat completion client and retry policy
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Outbound mail
pub mod mailer;

/// HTTP middleware
pub mod middleware;

/// Google sign-in
pub mod oauth;

/// One-time passcodes
pub mod otp;

/// Per-IP fixed window rate limiting
pub mod rate_limiting;

/// Shared handler state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Cookies and CSRF tokens
pub mod security;

/// Stylist chat orchestration
pub mod stylist;

/// Request field validation
pub mod validation;

pub use clothify_core::{constants, errors, models};
