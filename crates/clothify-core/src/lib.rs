// ABOUTME: Core types and constants for the Clothify styling assistant
// ABOUTME: Foundation crate with error handling, persisted records, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

#![deny(unsafe_code)]

//! # Clothify Core
//!
//! Foundation crate providing shared types and constants for the Clothify
//! service. It changes rarely, which keeps incremental builds of the server
//! crate cheap.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: User, conversation and chat log records

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Core data models (User, Conversation, `ChatLog`)
pub mod models;
