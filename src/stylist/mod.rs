// ABOUTME: Chat orchestration for the fashion and skincare assistant
// ABOUTME: Classifies the request, asks for gender when needed, composes the prompt and calls the LLM with fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Stylist
//!
//! One request flows through [`Stylist::respond`]:
//!
//! 1. classify the last message and pick the reply language
//! 2. for outfit requests with no gender anywhere in the history, return the
//!    clarifying question without calling the model
//! 3. compose the system prompt around a phrase from the bank
//! 4. call the model through the [`RetryPolicy`]
//! 5. clean the reply

/// Intent, gender, language and season rules
pub mod classify;
/// Phrase banks and pickers
pub mod phrases;
/// System prompt composer
pub mod prompt;

pub use classify::{Gender, Intent, Language, Season};
pub use phrases::{FixedPhrasePicker, PhrasePicker, RandomPhrasePicker};
pub use prompt::compose_system_prompt;

use crate::llm::{ChatMessage, ChatRequest, LlmProvider, RetryPolicy};
use clothify_core::errors::{AppError, AppResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Completion budget per reply
pub const MAX_REPLY_TOKENS: u32 = 350;

/// Sampling temperature
pub const TEMPERATURE: f32 = 0.8;

/// Clarifying question in English
pub const CLARIFY_GENDER_ENGLISH: &str =
    "Hold up! Are you a guy or a girl? Tell me so I can suggest!";

/// Clarifying question in Hinglish
pub const CLARIFY_GENDER_HINGLISH: &str =
    "Arre, ek sec! Tum ladka ho ya ladki? Batao toh main perfect outfit suggest karu!";

/// Drop blank lines and repeated lines, keeping first occurrences in order
#[must_use]
pub fn clean_response(text: &str) -> String {
    let mut seen = HashSet::new();
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| seen.insert(*line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chat orchestrator
#[derive(Clone)]
pub struct Stylist {
    provider: Arc<dyn LlmProvider>,
    policy: RetryPolicy,
    picker: Arc<dyn PhrasePicker>,
}

impl Stylist {
    /// Create a stylist with a random phrase picker
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        Self::with_picker(provider, policy, Arc::new(RandomPhrasePicker))
    }

    /// Create a stylist with an explicit phrase picker
    #[must_use]
    pub fn with_picker(
        provider: Arc<dyn LlmProvider>,
        policy: RetryPolicy,
        picker: Arc<dyn PhrasePicker>,
    ) -> Self {
        Self {
            provider,
            policy,
            picker,
        }
    }

    /// Build the system prompt for a conversation
    ///
    /// Returns `None` when an outfit request still needs the user's gender;
    /// the caller answers with [`Self::clarifying_question`] instead.
    #[must_use]
    pub fn plan(&self, messages: &[ChatMessage], season: Season) -> Option<String> {
        let last = messages.last().map_or("", |m| m.content.as_str());
        let intent = Intent::classify(last);
        let language = Language::detect(last);

        if intent == Intent::Outfit && Gender::detect(messages).is_none() {
            return None;
        }

        let phrase = match intent {
            Intent::Outfit | Intent::Skincare => self.picker.pick(phrases::bank(language)),
            Intent::Chat => "",
        };
        debug!(?intent, ?language, %season, "Composing stylist prompt");
        Some(compose_system_prompt(intent, season, phrase))
    }

    /// Clarifying question in the language of the last message
    #[must_use]
    pub fn clarifying_question(messages: &[ChatMessage]) -> &'static str {
        let last = messages.last().map_or("", |m| m.content.as_str());
        match Language::detect(last) {
            Language::English => CLARIFY_GENDER_ENGLISH,
            Language::Hinglish => CLARIFY_GENDER_HINGLISH,
        }
    }

    /// Produce the assistant reply for a conversation
    ///
    /// # Errors
    ///
    /// Returns an invalid input error for an empty history, or the completion
    /// error after the retry policy gives up
    pub async fn respond(&self, messages: &[ChatMessage]) -> AppResult<String> {
        if messages.is_empty() {
            return Err(AppError::invalid_input("No messages to respond to"));
        }

        let Some(system_prompt) = self.plan(messages, Season::current()) else {
            info!("Outfit request without gender, asking first");
            return Ok(Self::clarifying_question(messages).to_owned());
        };

        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(system_prompt));
        conversation.extend_from_slice(messages);

        let request = ChatRequest::new(conversation)
            .with_max_tokens(MAX_REPLY_TOKENS)
            .with_temperature(TEMPERATURE);

        let response = self
            .policy
            .complete(self.provider.as_ref(), &request)
            .await?;
        info!(provider = self.provider.name(), model = %response.model, "Stylist reply generated");
        Ok(clean_response(&response.content))
    }
}
