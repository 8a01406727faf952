// ABOUTME: Single retry policy combining per-model fallback and round backoff on upstream rate limits
// ABOUTME: Non rate-limit failures stop immediately; exhaustion returns the last rate-limit error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use super::{ChatRequest, ChatResponse, LlmProvider};
use crate::config::LlmConfig;
use clothify_core::errors::{AppError, AppResult};
use std::time::Duration;
use tracing::{info, warn};

/// Model fallback policy for chat completions
///
/// Each round walks `models` in order. A 429 moves on to the next model after
/// `model_backoff`; once every model has been rate limited the policy sleeps
/// `round_backoff * round` and starts over, up to `max_rounds` rounds.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Ordered model identifiers, primary first
    pub models: Vec<String>,
    /// Number of passes over `models`
    pub max_rounds: u32,
    /// Pause before moving to the next model
    pub model_backoff: Duration,
    /// Base pause between rounds
    pub round_backoff: Duration,
}

impl RetryPolicy {
    /// Build the policy from LLM settings
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            models: config.models.clone(),
            max_rounds: config.max_rounds,
            model_backoff: config.model_backoff,
            round_backoff: config.round_backoff,
        }
    }

    /// Run `request` against `provider`, overriding the model per attempt
    ///
    /// # Errors
    ///
    /// Returns the first non rate-limit error, or the last rate-limit error
    /// once all rounds are exhausted
    pub async fn complete(
        &self,
        provider: &dyn LlmProvider,
        request: &ChatRequest,
    ) -> AppResult<ChatResponse> {
        if self.models.is_empty() || self.max_rounds == 0 {
            return Err(AppError::config("No LLM models configured"));
        }

        let mut last_error = None;
        for round in 1..=self.max_rounds {
            for (index, model) in self.models.iter().enumerate() {
                let attempt = request.clone().with_model(model.clone());
                match provider.complete(&attempt).await {
                    Ok(response) => {
                        info!(model = %model, round, "Chat completion succeeded");
                        return Ok(response);
                    }
                    Err(e) if e.is_external_rate_limit() => {
                        warn!(model = %model, round, "Model rate limited: {}", e.message);
                        last_error = Some(e);
                        if index + 1 < self.models.len() {
                            tokio::time::sleep(self.model_backoff).await;
                        }
                    }
                    Err(e) => {
                        warn!(model = %model, round, "Chat completion failed: {}", e.message);
                        return Err(e);
                    }
                }
            }

            if round < self.max_rounds {
                let pause = self.round_backoff * round;
                warn!(round, pause = ?pause, "All models rate limited, backing off");
                tokio::time::sleep(pause).await;
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::internal("Retry policy made no attempts")))
    }
}
