// ABOUTME: Cookie parsing and Set-Cookie construction for session and CSRF cookies
// ABOUTME: Production cookies are Secure with SameSite=None, development cookies use SameSite=Lax
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use clothify_core::constants::cookies::{CSRF_COOKIE, SESSION_COOKIE};
use clothify_core::constants::time;

/// Attributes shared by every cookie the server sets
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    /// Mark cookies `Secure; SameSite=None`
    pub production: bool,
}

impl CookiePolicy {
    /// Create a policy for the given environment
    #[must_use]
    pub const fn new(production: bool) -> Self {
        Self { production }
    }

    fn attributes(self) -> &'static str {
        if self.production {
            "Path=/; Secure; SameSite=None"
        } else {
            "Path=/; SameSite=Lax"
        }
    }

    /// `Set-Cookie` value carrying a session token
    #[must_use]
    pub fn session_cookie(self, token: &str, max_age_secs: i64) -> String {
        self.http_only_cookie(SESSION_COOKIE, token, max_age_secs)
    }

    /// `Set-Cookie` value hidden from scripts
    #[must_use]
    pub fn http_only_cookie(self, name: &str, value: &str, max_age_secs: i64) -> String {
        format!(
            "{name}={value}; Max-Age={max_age_secs}; HttpOnly; {}",
            self.attributes()
        )
    }

    /// `Set-Cookie` value carrying a CSRF token; readable by scripts
    #[must_use]
    pub fn csrf_cookie(self, token: &str) -> String {
        format!(
            "{CSRF_COOKIE}={token}; Max-Age={}; {}",
            time::CSRF_TOKEN_TTL_SECS,
            self.attributes()
        )
    }

    /// `Set-Cookie` value that expires `name` immediately
    #[must_use]
    pub fn clear_cookie(self, name: &str) -> String {
        format!(
            "{name}=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; {}",
            self.attributes()
        )
    }
}

/// Read a cookie value from the request headers
///
/// All `Cookie` headers are scanned, since HTTP/2 clients may split them.
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
        .filter(|value| !value.is_empty())
}

/// Append a `Set-Cookie` header
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Refusing to emit malformed Set-Cookie header: {e}"),
    }
}
