// ABOUTME: Per-IP fixed-window request counting for the HTTP routes
// ABOUTME: Separate budgets per route bucket, tracked in a sharded concurrent map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use crate::config::RateLimitConfig;
use chrono::Utc;
use dashmap::DashMap;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Map size above which stale windows are pruned on the next check
const CLEANUP_THRESHOLD: usize = 10_000;

/// Route group sharing one request budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitBucket {
    /// Account endpoints
    Auth,
    /// Assistant, conversation and chat-log endpoints
    Api,
    /// Contact form
    Message,
    /// Support form
    Support,
}

impl RateLimitBucket {
    /// Stable name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Api => "api",
            Self::Message => "message",
            Self::Support => "support",
        }
    }

    /// Body message of the 429 response
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Auth | Self::Support => "Too many requests from this IP, please try again later",
            Self::Api => "Too many requests, please try again later.",
            Self::Message => "Too many messages sent from this IP, please try again later",
        }
    }

    /// Requests allowed per window
    #[must_use]
    pub const fn limit(self, config: &RateLimitConfig) -> u32 {
        match self {
            Self::Auth => config.auth,
            Self::Api => config.api,
            Self::Message => config.message,
            Self::Support => config.support,
        }
    }
}

impl fmt::Display for RateLimitBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one counted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Whether the request must be rejected
    pub is_limited: bool,
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window after this one
    pub remaining: u32,
    /// Unix timestamp at which the window resets
    pub reset_at: i64,
    /// Seconds until the window resets, at least 1
    pub retry_after_secs: u64,
}

/// Fixed-window limiter keyed by `(bucket, client ip)`
///
/// `DashMap` shards the state so concurrent requests from different clients
/// do not contend on one lock.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<DashMap<(RateLimitBucket, IpAddr), (u32, Instant)>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a limiter with the given budgets
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Count a request and report whether it fits the budget
    ///
    /// Rejected requests are not counted.
    #[must_use]
    pub fn check(&self, bucket: RateLimitBucket, client_ip: IpAddr) -> RateLimitStatus {
        let limit = bucket.limit(&self.config);
        let window = self.config.window;
        let now = Instant::now();

        let mut entry = self.state.entry((bucket, client_ip)).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) >= window {
            *count = 0;
            *window_start = now;
        }

        let is_limited = *count >= limit;
        if !is_limited {
            *count += 1;
        }
        let remaining = limit.saturating_sub(*count);
        let started = *window_start;
        drop(entry);

        if self.state.len() > CLEANUP_THRESHOLD {
            self.cleanup_old_entries(now);
        }

        let until_reset = window.saturating_sub(now.duration_since(started));
        let retry_after_secs = until_reset.as_secs_f64().ceil().max(1.0) as u64;

        RateLimitStatus {
            is_limited,
            limit,
            remaining,
            reset_at: Utc::now().timestamp() + retry_after_secs as i64,
            retry_after_secs,
        }
    }

    fn cleanup_old_entries(&self, now: Instant) {
        let window = self.config.window;
        self.state
            .retain(|_, (_, start)| now.duration_since(*start) < window);
    }

    /// Window length
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.config.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn limiter(window: Duration) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            window,
            auth: 20,
            api: 100,
            message: 3,
            support: 5,
        })
    }

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const OTHER: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn test_fourth_message_is_rejected() {
        let limiter = limiter(Duration::from_secs(900));
        for expected_remaining in [2, 1, 0] {
            let status = limiter.check(RateLimitBucket::Message, CLIENT);
            assert!(!status.is_limited);
            assert_eq!(status.remaining, expected_remaining);
        }

        let status = limiter.check(RateLimitBucket::Message, CLIENT);
        assert!(status.is_limited);
        assert_eq!(status.limit, 3);
        assert!(status.retry_after_secs > 0 && status.retry_after_secs <= 900);
    }

    #[test]
    fn test_buckets_and_clients_are_independent() {
        let limiter = limiter(Duration::from_secs(900));
        for _ in 0..3 {
            let _ = limiter.check(RateLimitBucket::Message, CLIENT);
        }
        assert!(limiter.check(RateLimitBucket::Message, CLIENT).is_limited);
        assert!(!limiter.check(RateLimitBucket::Support, CLIENT).is_limited);
        assert!(!limiter.check(RateLimitBucket::Message, OTHER).is_limited);
    }

    #[test]
    fn test_window_expiry_resets_count() {
        let limiter = limiter(Duration::ZERO);
        for _ in 0..10 {
            assert!(!limiter.check(RateLimitBucket::Message, CLIENT).is_limited);
        }
    }
}
