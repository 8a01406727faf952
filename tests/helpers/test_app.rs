// ABOUTME: In-process Clothify application for integration tests
// ABOUTME: In-memory SQLite, captured mail, a manual OTP clock and a wiremock LLM endpoint

#![allow(dead_code)]

use super::axum_test::{AxumTestRequest, AxumTestResponse};
use axum::http::StatusCode;
use axum::Router;
use chrono::Utc;
use clothify::config::{GoogleOAuthConfig, LlmConfig, RateLimitConfig, ServerConfig};
use clothify::database::Database;
use clothify::llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider, RetryPolicy};
use clothify::mailer::CapturingMailer;
use clothify::oauth::GoogleOAuthClient;
use clothify::otp::{InMemoryOtpStore, ManualClock};
use clothify::resources::ServerResources;
use clothify::routes::build_router;
use clothify::stylist::{FixedPhrasePicker, Stylist};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_SECRET: &str = "integration-test-secret-with-enough-bytes";
pub const FRONTEND_URL: &str = "http://localhost:5173";
pub const TEST_PASSWORD: &str = "hunter22";

/// Application wired to in-memory collaborators
pub struct TestApp {
    pub resources: Arc<ServerResources>,
    pub mailer: Arc<CapturingMailer>,
    pub clock: Arc<ManualClock>,
    pub llm: MockServer,
    /// Token and userinfo endpoints when Google sign-in is enabled
    pub google: Option<MockServer>,
}

impl TestApp {
    /// Default configuration
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Adjust the configuration before resources are built
    pub async fn with_config(adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        Self::build(adjust, false).await
    }

    /// Google sign-in against a mock token and userinfo server
    pub async fn with_google() -> Self {
        Self::build(|_| {}, true).await
    }

    async fn build(adjust: impl FnOnce(&mut ServerConfig), google: bool) -> Self {
        let llm = MockServer::start().await;
        let google_server = if google {
            Some(MockServer::start().await)
        } else {
            None
        };

        let mut config = ServerConfig::new("sqlite::memory:", TEST_SECRET, FRONTEND_URL);
        config.owner_email = "owner@clothify.test".to_owned();
        config.support_email = "support@clothify.test".to_owned();
        config.llm = LlmConfig {
            base_url: llm.uri(),
            api_key: Some("test-key".to_owned()),
            models: vec!["primary-model".to_owned(), "backup-model".to_owned()],
            max_rounds: 1,
            model_backoff: Duration::from_millis(1),
            round_backoff: Duration::from_millis(1),
            ..LlmConfig::default()
        };
        config.rate_limits = RateLimitConfig::default();
        adjust(&mut config);

        let database = Database::new(&config.database_url).await.unwrap();
        let mailer = Arc::new(CapturingMailer::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let otp_store = Arc::new(InMemoryOtpStore::new(clock.clone()));

        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from_llm_config(
            &config.llm,
            FRONTEND_URL,
        ))
        .unwrap();
        let stylist = Stylist::with_picker(
            Arc::new(provider),
            RetryPolicy::from_config(&config.llm),
            Arc::new(FixedPhrasePicker(0)),
        );

        let google_client = google_server.as_ref().map(|server| {
            GoogleOAuthClient::with_endpoints(
                GoogleOAuthConfig {
                    client_id: "google-client".to_owned(),
                    client_secret: "google-secret".to_owned(),
                    redirect_uri: "http://localhost:3000/api/auth/google/callback".to_owned(),
                },
                &format!("{}/auth", server.uri()),
                &format!("{}/token", server.uri()),
                &format!("{}/userinfo", server.uri()),
            )
            .unwrap()
        });

        let resources = ServerResources::new(
            database,
            config,
            otp_store,
            mailer.clone(),
            stylist,
            google_client,
        );

        Self {
            resources: Arc::new(resources),
            mailer,
            clock,
            llm,
            google: google_server,
        }
    }

    /// Fresh router over the shared resources
    pub fn router(&self) -> Router {
        build_router(self.resources.clone())
    }

    /// Mint an anonymous CSRF token
    pub async fn csrf_token(&self) -> String {
        self.csrf_token_for(None).await
    }

    /// Mint a CSRF token, bound to the session when one is given
    pub async fn csrf_token_for(&self, session: Option<&str>) -> String {
        let mut request = AxumTestRequest::get("/api/csrf-token");
        if let Some(token) = session {
            request = request.session(token);
        }
        let body: Value = request
            .send(self.router())
            .await
            .assert_status(StatusCode::OK)
            .json();
        body["csrfToken"].as_str().unwrap().to_owned()
    }

    /// POST with a fresh anonymous CSRF token
    pub async fn post(&self, uri: &str, body: &Value) -> AxumTestResponse {
        let csrf = self.csrf_token().await;
        AxumTestRequest::post(uri)
            .csrf(&csrf)
            .json(body)
            .send(self.router())
            .await
    }

    /// Sign up and return the new user id
    pub async fn signup(&self, email: &str) -> String {
        let body: Value = self
            .post(
                "/api/auth/signup",
                &json!({ "email": email, "password": TEST_PASSWORD, "fullName": "Asha Rao" }),
            )
            .await
            .assert_status(StatusCode::CREATED)
            .json();
        body["userId"].as_str().unwrap().to_owned()
    }

    /// Sign up, confirm the code and return `(user id, session token)`
    pub async fn verified_session(&self, email: &str) -> (String, String) {
        let user_id = self.signup(email).await;
        let code = self.mailer.last_code_for(email).unwrap();
        let response = self
            .post(
                "/api/auth/verify-otp",
                &json!({ "userId": user_id, "otp": code, "context": "signup" }),
            )
            .await
            .assert_status(StatusCode::OK);
        let token = response.cookie("jwt").unwrap();
        (user_id, token)
    }
}
