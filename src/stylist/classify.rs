// ABOUTME: Message classification for the stylist: intent, gender, reply language and season
// ABOUTME: Keyword rules are case-insensitive regexes compiled once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use crate::llm::ChatMessage;
use chrono::{Datelike, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Skincare keywords; checked before outfit keywords
static SKINCARE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(skincare|skin care|pimple|acne|dry skin|oily skin|glow|dull|dark spot|wrinkle|anti-aging|fairness|cleanser|moisturizer|sunscreen|toner|serum|face pack)",
    )
    .ok()
});

static OUTFIT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(outfit|wear|dress|attire|clothing|fashion|style)").ok());

/// Gender synonyms as whole whitespace-delimited words
static GENDER_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s)(male|man|guy|ladka|boy|female|woman|girl|ladki)(?:$|\s)").ok()
});

static HINGLISH_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(acha|thoda|kya|hai|ho|nahi|please|help|suggest)").ok()
});

const MALE_WORDS: &[&str] = &["male", "man", "guy", "ladka", "boy"];

fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Clothing suggestions
    Outfit,
    /// Skincare routine
    Skincare,
    /// Anything else
    Chat,
}

impl Intent {
    /// Classify a message; skincare wins over outfit
    #[must_use]
    pub fn classify(message: &str) -> Self {
        if matches(&SKINCARE_PATTERN, message) {
            Self::Skincare
        } else if matches(&OUTFIT_PATTERN, message) {
            Self::Outfit
        } else {
            Self::Chat
        }
    }
}

/// Gender mentioned somewhere in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    /// male, man, guy, ladka, boy
    Male,
    /// female, woman, girl, ladki
    Female,
}

impl Gender {
    /// First gender word found scanning messages in order
    #[must_use]
    pub fn detect(messages: &[ChatMessage]) -> Option<Self> {
        let pattern = GENDER_PATTERN.as_ref()?;
        messages.iter().find_map(|message| {
            let word = pattern.captures(&message.content)?.get(1)?.as_str().to_lowercase();
            Some(if MALE_WORDS.contains(&word.as_str()) {
                Self::Male
            } else {
                Self::Female
            })
        })
    }
}

/// Language the reply should be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Plain English
    English,
    /// Hindi-English mix
    Hinglish,
}

impl Language {
    /// Hinglish when the message has Devanagari or a common Hindi/ask word
    #[must_use]
    pub fn detect(message: &str) -> Self {
        let devanagari = message.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c));
        if devanagari || matches(&HINGLISH_PATTERN, message) {
            Self::Hinglish
        } else {
            Self::English
        }
    }
}

/// Indian season used to steer suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    /// March to June
    Summer,
    /// July to September
    Monsoon,
    /// October to February
    Winter,
}

impl Season {
    /// Season for a 1-based month
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            3..=6 => Self::Summer,
            7..=9 => Self::Monsoon,
            _ => Self::Winter,
        }
    }

    /// Season for the current UTC month
    #[must_use]
    pub fn current() -> Self {
        Self::from_month(Utc::now().month())
    }

    /// Lower-case name used in the prompt
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summer => "summer",
            Self::Monsoon => "monsoon",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
