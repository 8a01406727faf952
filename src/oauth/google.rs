// ABOUTME: Google OAuth2 authorization-code client for account sign-in
// ABOUTME: Builds the consent URL, exchanges the code and fetches the user's profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use crate::config::GoogleOAuthConfig;
use clothify_core::errors::{AppError, AppResult};
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Scopes requested at consent
pub const SCOPES: &str = "openid email profile";

const REQUEST_TIMEOUT_SECS: u64 = 15;

const SERVICE: &str = "Google OAuth";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Profile returned by the userinfo endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleProfile {
    /// Stable Google account id
    #[serde(rename = "sub")]
    pub id: String,
    /// Primary email
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleProfile {
    /// Display name, or the local part of the email when Google has none
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(
                || {
                    self.email
                        .as_deref()
                        .and_then(|email| email.split('@').next())
                        .unwrap_or_default()
                        .to_owned()
                },
                str::to_owned,
            )
    }
}

/// Google OAuth2 client
#[derive(Clone)]
pub struct GoogleOAuthClient {
    config: GoogleOAuthConfig,
    client: reqwest::Client,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    /// Create a client against Google's production endpoints
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: GoogleOAuthConfig) -> AppResult<Self> {
        Self::with_endpoints(config, AUTH_URL, TOKEN_URL, USERINFO_URL)
    }

    /// Create a client against custom endpoints
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn with_endpoints(
        config: GoogleOAuthConfig,
        auth_url: &str,
        token_url: &str,
        userinfo_url: &str,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            auth_url: auth_url.to_owned(),
            token_url: token_url.to_owned(),
            userinfo_url: userinfo_url.to_owned(),
        })
    }

    /// Random value round-tripped through the consent screen
    #[must_use]
    pub fn generate_state() -> String {
        let bytes: [u8; 16] = rand::thread_rng().gen();
        hex::encode(bytes)
    }

    /// Consent page URL
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the authorization URL is malformed
    pub fn authorization_url(&self, state: &str) -> AppResult<String> {
        let mut url = Url::parse(&self.auth_url)
            .map_err(|e| AppError::config(format!("Invalid Google auth URL: {e}")))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("prompt", "select_account")
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Exchange an authorization code and fetch the signed-in profile
    ///
    /// # Errors
    ///
    /// Returns an external service error if either call fails
    pub async fn fetch_profile(&self, code: &str) -> AppResult<GoogleProfile> {
        let access_token = self.exchange_code(code).await?;

        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("Profile request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Google profile request rejected");
            return Err(AppError::external_service(
                SERVICE,
                format!("Profile request returned {status}"),
            ));
        }

        let profile: GoogleProfile = response
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("Invalid profile: {e}")))?;
        debug!(google_id = %profile.id, "Fetched Google profile");
        Ok(profile)
    }

    async fn exchange_code(&self, code: &str) -> AppResult<String> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Google token exchange rejected");
            return Err(AppError::external_service(
                SERVICE,
                format!("Token exchange returned {status}"),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("Invalid token response: {e}")))?;
        Ok(token.access_token)
    }
}
