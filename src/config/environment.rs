// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses required secrets, LLM retry settings, mail relay and OAuth credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! Environment-based configuration
//!
//! All configuration comes from environment variables. `JWT_SECRET_KEY`,
//! `FRONTEND_URL` and `DATABASE_URL` are required; everything else has a
//! default suitable for local development.

use anyhow::{anyhow, Context, Result};
use clothify_core::constants::{ports, time};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Default OpenAI-compatible endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Models tried in order when the previous one is rate limited
pub const DEFAULT_LLM_MODELS: &[&str] = &[
    "deepseek/deepseek-chat-v3-0324:free",
    "meta-llama/llama-3.3-70b-instruct:free",
];

/// Default owner inbox for the contact form
pub const DEFAULT_OWNER_EMAIL: &str = "mritunjaythakur903@gmail.com";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development: lax cookies, logging mailer allowed
    #[default]
    Development,
    /// Production: secure cross-site cookies
    Production,
}

impl Environment {
    /// Parse from `NODE_ENV`/`ENVIRONMENT` style values
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Whether this is a production deployment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Chat-completion provider and retry settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Bearer token for the API
    pub api_key: Option<String>,
    /// Ordered fallback model list, primary first
    pub models: Vec<String>,
    /// Number of passes over the model list on persistent rate limiting
    pub max_rounds: u32,
    /// Pause before trying the next model after a 429
    pub model_backoff: Duration,
    /// Base pause between passes, multiplied by the pass number
    pub round_backoff: Duration,
    /// `X-Title` header sent to the provider
    pub app_title: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_owned(),
            api_key: None,
            models: DEFAULT_LLM_MODELS.iter().map(|m| (*m).to_owned()).collect(),
            max_rounds: 3,
            model_backoff: Duration::from_secs(1),
            round_backoff: Duration::from_secs(2),
            app_title: "Desi Fashion Assistant".to_owned(),
        }
    }
}

/// SMTP relay settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Relay host
    pub host: String,
    /// Relay port; 465 implies implicit TLS
    pub port: u16,
    /// Relay username
    pub username: String,
    /// Relay password
    pub password: String,
    /// Sender address
    pub from_address: String,
}

/// Google OAuth client settings
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Registered redirect URI pointing at `/api/auth/google/callback`
    pub redirect_uri: String,
}

/// Per-bucket request budgets for one rate limiting window
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Window length
    pub window: Duration,
    /// Budget for `/auth/*`
    pub auth: u32,
    /// Budget for assistant, conversation and chat routes
    pub api: u32,
    /// Budget for the contact form
    pub message: u32,
    /// Budget for support requests
    pub support: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(time::RATE_LIMIT_WINDOW_SECS),
            auth: 20,
            api: 100,
            message: 3,
            support: 5,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// sqlx database URL
    pub database_url: String,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Frontend base URL used for redirects and CORS
    pub frontend_url: String,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
    /// Deployment environment
    pub environment: Environment,
    /// Chat-completion settings
    pub llm: LlmConfig,
    /// SMTP settings; `None` selects the logging mailer
    pub mail: Option<MailConfig>,
    /// Inbox receiving contact-form mail
    pub owner_email: String,
    /// Inbox receiving support requests
    pub support_email: String,
    /// Google OAuth settings; `None` disables the Google routes
    pub google: Option<GoogleOAuthConfig>,
    /// Request budgets
    pub rate_limits: RateLimitConfig,
}

impl ServerConfig {
    /// Build a configuration from the three required values, defaulting the rest
    #[must_use]
    pub fn new(database_url: &str, jwt_secret: &str, frontend_url: &str) -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            http_port: ports::DEFAULT_HTTP_PORT,
            database_url: database_url.to_owned(),
            jwt_secret: jwt_secret.to_owned(),
            frontend_url: frontend_url.trim_end_matches('/').to_owned(),
            cors_origins: parse_list(frontend_url),
            environment: Environment::Development,
            llm: LlmConfig::default(),
            mail: None,
            owner_email: DEFAULT_OWNER_EMAIL.to_owned(),
            support_email: DEFAULT_OWNER_EMAIL.to_owned(),
            google: None,
            rate_limits: RateLimitConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric value
    /// cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let missing: Vec<&str> = ["JWT_SECRET_KEY", "FRONTEND_URL", "DATABASE_URL"]
            .into_iter()
            .filter(|key| env_opt(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!(
                "Missing environment variables: {}",
                missing.join(", ")
            ));
        }

        let frontend_raw = env_required("FRONTEND_URL")?;
        let frontend_url = parse_list(&frontend_raw)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("FRONTEND_URL is empty"))?;

        let mut config = Self::new(
            &env_required("DATABASE_URL")?,
            &env_required("JWT_SECRET_KEY")?,
            &frontend_url,
        );
        config.cors_origins = parse_list(&frontend_raw);
        config.host = env_var_or("HOST", "0.0.0.0");
        config.http_port = env_parse_or("HTTP_PORT", ports::DEFAULT_HTTP_PORT)?;
        config.environment = Environment::from_str_or_default(
            &env_opt("NODE_ENV")
                .or_else(|| env_opt("ENVIRONMENT"))
                .unwrap_or_default(),
        );
        config.llm = Self::llm_from_env()?;
        config.mail = Self::mail_from_env()?;
        config.owner_email = env_var_or("OWNER_EMAIL", DEFAULT_OWNER_EMAIL);
        config.support_email = env_opt("SUPPORT_EMAIL").unwrap_or_else(|| config.owner_email.clone());
        config.google = Self::google_from_env();

        config.validate()?;
        Ok(config)
    }

    fn llm_from_env() -> Result<LlmConfig> {
        let defaults = LlmConfig::default();
        let models = env_opt("LLM_MODELS").map_or(defaults.models, |raw| parse_list(&raw));
        Ok(LlmConfig {
            base_url: env_var_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            api_key: env_opt("OPENROUTER_API_KEY"),
            models,
            max_rounds: env_parse_or("LLM_MAX_ROUNDS", defaults.max_rounds)?,
            model_backoff: Duration::from_millis(env_parse_or(
                "LLM_MODEL_BACKOFF_MS",
                defaults.model_backoff.as_millis() as u64,
            )?),
            round_backoff: Duration::from_millis(env_parse_or(
                "LLM_ROUND_BACKOFF_MS",
                defaults.round_backoff.as_millis() as u64,
            )?),
            app_title: defaults.app_title,
        })
    }

    fn mail_from_env() -> Result<Option<MailConfig>> {
        let (Some(host), Some(username), Some(password)) = (
            env_opt("EMAIL_HOST"),
            env_opt("EMAIL_USER"),
            env_opt("EMAIL_PASS"),
        ) else {
            return Ok(None);
        };
        let from_address = env_opt("EMAIL_FROM").unwrap_or_else(|| username.clone());
        Ok(Some(MailConfig {
            host,
            port: env_parse_or("EMAIL_PORT", 587)?,
            username,
            password,
            from_address,
        }))
    }

    fn google_from_env() -> Option<GoogleOAuthConfig> {
        Some(GoogleOAuthConfig {
            client_id: env_opt("GOOGLE_CLIENT_ID")?,
            client_secret: env_opt("GOOGLE_CLIENT_SECRET")?,
            redirect_uri: env_opt("GOOGLE_CALLBACK_URL")?,
        })
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error if the model list is empty or no retry round is allowed
    pub fn validate(&self) -> Result<()> {
        if self.llm.models.is_empty() {
            return Err(anyhow!("LLM_MODELS must name at least one model"));
        }
        if self.llm.max_rounds == 0 {
            return Err(anyhow!("LLM_MAX_ROUNDS must be at least 1"));
        }
        if self.llm.api_key.is_none() {
            warn!("OPENROUTER_API_KEY is not set; completion requests will be unauthenticated");
        }
        if self.mail.is_none() {
            if self.environment.is_production() {
                return Err(anyhow!(
                    "EMAIL_HOST, EMAIL_USER and EMAIL_PASS are required in production"
                ));
            }
            warn!("SMTP relay not configured; outbound mail will only be logged");
        }
        if self.google.is_none() {
            warn!("Google OAuth not configured; /auth/google routes will redirect with an error");
        }
        Ok(())
    }

    /// One-line-per-setting summary for startup logs (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Clothify Server Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Frontend: {}\n\
             - LLM: {} ({} models, {} rounds)\n\
             - SMTP: {}\n\
             - Google OAuth: {}",
            self.host,
            self.http_port,
            self.environment,
            self.frontend_url,
            self.llm.base_url,
            self.llm.models.len(),
            self.llm.max_rounds,
            self.mail
                .as_ref()
                .map_or_else(|| "disabled (logging)".to_owned(), |m| format!("{}:{}", m.host, m.port)),
            if self.google.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

/// Read a variable, treating empty values as absent
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_required(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| anyhow!("Missing environment variable: {key}"))
}

fn env_var_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_owned())
}

fn env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_opt(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}"))
    })
}

/// Parse a comma-separated list, dropping blanks and trailing slashes
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
