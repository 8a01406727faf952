// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the request builder and an in-process application harness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
pub mod test_app;
