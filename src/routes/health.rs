// ABOUTME: Health check route handler for load balancers and uptime monitors
// ABOUTME: Reports process uptime and the current time in epoch milliseconds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! Health check routes

use crate::resources::ServerResources;
use axum::{extract::State, routing::get, Json, Router};
use clothify_core::constants::endpoints;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Seconds since startup
    pub uptime: f64,
    /// Always `OK`
    pub message: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        async fn health_handler(
            State(resources): State<Arc<ServerResources>>,
        ) -> Json<HealthResponse> {
            Json(HealthResponse {
                uptime: resources.started_at.elapsed().as_secs_f64(),
                message: "OK".to_owned(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            })
        }

        Router::new()
            .route(endpoints::HEALTH_CHECK, get(health_handler))
            .with_state(resources)
    }
}
