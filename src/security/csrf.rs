// ABOUTME: CSRF (Cross-Site Request Forgery) protection token generation and validation
// ABOUTME: Tokens may be bound to a session user and expire after twenty-four hours
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! CSRF protection module
//!
//! Generates cryptographically secure CSRF tokens and provides validation.
//! A token minted while a session is present is bound to that user; an
//! anonymous token is accepted from any caller.

use chrono::{DateTime, Duration, Utc};
use clothify_core::constants::time;
use clothify_core::errors::{AppError, AppResult};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// CSRF token length in bytes (32 bytes = 256 bits)
const CSRF_TOKEN_LENGTH: usize = 32;

/// Live tokens kept before the oldest are evicted
pub const MAX_CSRF_TOKENS: usize = 50_000;

/// CSRF token metadata (token itself is the `HashMap` key)
#[derive(Clone)]
struct CsrfToken {
    user_id: Option<Uuid>,
    expires_at: DateTime<Utc>,
}

/// CSRF token manager with in-memory storage
pub struct CsrfTokenManager {
    tokens: Arc<RwLock<HashMap<String, CsrfToken>>>,
    ttl: Duration,
    max_tokens: usize,
}

impl CsrfTokenManager {
    /// Create a new CSRF token manager
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(time::CSRF_TOKEN_TTL_SECS))
    }

    /// Create a manager with a custom token lifetime
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_limits(ttl, MAX_CSRF_TOKENS)
    }

    /// Create a manager with a custom lifetime and store size
    #[must_use]
    pub fn with_limits(ttl: Duration, max_tokens: usize) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            max_tokens: max_tokens.max(1),
        }
    }

    /// Generate a new CSRF token, bound to `user_id` when one is given
    pub async fn generate_token(&self, user_id: Option<Uuid>) -> String {
        let random_bytes: Vec<u8> = (0..CSRF_TOKEN_LENGTH)
            .map(|_| rand::thread_rng().gen())
            .collect();

        let token = hex::encode(random_bytes);
        let expires_at = Utc::now() + self.ttl;

        let mut tokens = self.tokens.write().await;
        if tokens.len() >= self.max_tokens {
            Self::cleanup_expired_tokens_locked(&mut tokens);
        }
        while tokens.len() >= self.max_tokens {
            let Some(oldest) = Self::oldest_token_locked(&tokens) else {
                break;
            };
            tokens.remove(&oldest);
        }
        tokens.insert(token.clone(), CsrfToken { user_id, expires_at });
        drop(tokens);

        token
    }

    /// Validate a CSRF token for the caller's session
    ///
    /// # Errors
    ///
    /// Returns a CSRF error if the token is unknown or expired, or if it was
    /// minted for a different user than `session_user`
    pub async fn validate_token(&self, token: &str, session_user: Option<Uuid>) -> AppResult<()> {
        let csrf_token = {
            let tokens = self.tokens.read().await;
            tokens.get(token).cloned().ok_or_else(AppError::csrf_invalid)?
        };

        if Utc::now() > csrf_token.expires_at {
            self.invalidate_token(token).await;
            return Err(AppError::csrf_invalid());
        }

        if let Some(bound) = csrf_token.user_id {
            if session_user != Some(bound) {
                return Err(AppError::csrf_invalid());
            }
        }

        Ok(())
    }

    /// Invalidate a CSRF token
    pub async fn invalidate_token(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }

    fn cleanup_expired_tokens_locked(tokens: &mut HashMap<String, CsrfToken>) {
        let now = Utc::now();
        tokens.retain(|_, csrf_token| csrf_token.expires_at > now);
    }

    /// Every token gets the same lifetime, so the earliest expiry is the oldest
    fn oldest_token_locked(tokens: &HashMap<String, CsrfToken>) -> Option<String> {
        tokens
            .iter()
            .min_by_key(|(_, csrf_token)| csrf_token.expires_at)
            .map(|(token, _)| token.clone())
    }

    /// Number of stored tokens, expired ones included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Whether no tokens are stored
    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

impl Default for CsrfTokenManager {
    fn default() -> Self {
        Self::new()
    }
}
