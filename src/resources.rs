// ABOUTME: Shared resource container handed to every route handler
// ABOUTME: Holds the database, session and CSRF managers, OTP store, mailer, stylist and limiter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Server Resources
//!
//! Everything a handler needs is built once at startup and shared through
//! `Arc<ServerResources>` as axum state.

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider, RetryPolicy};
use crate::mailer::{LogMailer, Mailer, SmtpMailer};
use crate::oauth::GoogleOAuthClient;
use crate::otp::{InMemoryOtpStore, OtpStore, SystemClock};
use crate::rate_limiting::RateLimiter;
use crate::security::cookies::CookiePolicy;
use crate::security::csrf::CsrfTokenManager;
use crate::stylist::Stylist;
use clothify_core::constants::time;
use clothify_core::errors::AppResult;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Persistence
    pub database: Arc<Database>,
    /// Session tokens and password hashes
    pub auth_manager: Arc<AuthManager>,
    /// One-time codes
    pub otp_store: Arc<dyn OtpStore>,
    /// Outbound mail
    pub mailer: Arc<dyn Mailer>,
    /// CSRF tokens
    pub csrf_manager: Arc<CsrfTokenManager>,
    /// Per-IP budgets
    pub rate_limiter: RateLimiter,
    /// Chat orchestration
    pub stylist: Arc<Stylist>,
    /// Google sign-in, absent when not configured
    pub google: Option<Arc<GoogleOAuthClient>>,
    /// Cookie attributes for the deployment
    pub cookie_policy: CookiePolicy,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Process start, for uptime
    pub started_at: Instant,
}

impl ServerResources {
    /// Assemble resources from already-built collaborators
    #[must_use]
    pub fn new(
        database: Database,
        config: ServerConfig,
        otp_store: Arc<dyn OtpStore>,
        mailer: Arc<dyn Mailer>,
        stylist: Stylist,
        google: Option<GoogleOAuthClient>,
    ) -> Self {
        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(AuthManager::new(&config.jwt_secret)),
            otp_store,
            mailer,
            csrf_manager: Arc::new(CsrfTokenManager::new()),
            rate_limiter: RateLimiter::new(config.rate_limits),
            stylist: Arc::new(stylist),
            google: google.map(Arc::new),
            cookie_policy: CookiePolicy::new(config.environment.is_production()),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Build production resources from configuration
    ///
    /// Returns the resources and the OTP store so the caller can stop its
    /// sweeper on shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the database, mailer, LLM or OAuth client cannot
    /// be created
    pub async fn from_config(config: ServerConfig) -> AppResult<(Self, Arc<InMemoryOtpStore>)> {
        let database = Database::new(&config.database_url).await?;

        let otp_store = Arc::new(InMemoryOtpStore::with_sweeper(
            Arc::new(SystemClock),
            Duration::from_secs(time::OTP_SWEEP_INTERVAL_SECS),
        ));

        let mailer: Arc<dyn Mailer> = match &config.mail {
            Some(mail) => Arc::new(SmtpMailer::new(mail)?),
            None => {
                warn!("SMTP not configured, outgoing mail will only be logged");
                Arc::new(LogMailer)
            }
        };

        if config.llm.api_key.is_none() {
            warn!("OPENROUTER_API_KEY not set, assistant requests will fail upstream");
        }
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from_llm_config(
            &config.llm,
            &config.frontend_url,
        ))?;
        let stylist = Stylist::new(Arc::new(provider), RetryPolicy::from_config(&config.llm));

        let google = config
            .google
            .clone()
            .map(GoogleOAuthClient::new)
            .transpose()?;
        if google.is_none() {
            info!("Google OAuth not configured, /auth/google is disabled");
        }

        let resources = Self::new(
            database,
            config,
            otp_store.clone(),
            mailer,
            stylist,
            google,
        );
        Ok((resources, otp_store))
    }
}
