// ABOUTME: One-time passcode tickets for email verification, password reset and profile changes
// ABOUTME: Defines the injectable OtpStore trait, ticket contexts, pending payloads and the clock seam
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # One-Time Passcodes
//!
//! Each subject (a user id) holds at most one live ticket. A ticket carries a
//! six digit code, the context it was issued for, and an optional payload
//! describing a change to apply once the code is confirmed.

mod memory;

pub use memory::InMemoryOtpStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clothify_core::errors::AppResult;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use uuid::Uuid;

/// Number of digits in a code
pub const OTP_DIGITS: usize = 6;

/// Wrong guesses tolerated before a ticket is discarded
pub const MAX_OTP_ATTEMPTS: u32 = 5;

/// What a ticket authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpContext {
    /// Confirm the email of a new account
    Signup,
    /// Authorize a password reset
    PasswordReset,
    /// Confirm a sensitive profile change
    ProfileUpdate,
}

impl OtpContext {
    /// Wire form used in request bodies
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::PasswordReset => "password-reset",
            Self::ProfileUpdate => "profile-update",
        }
    }

    /// Subject line for the mail carrying the code
    #[must_use]
    pub const fn mail_subject(self) -> &'static str {
        match self {
            Self::Signup => "Verify your Clothify account",
            Self::PasswordReset => "Reset your Clothify password",
            Self::ProfileUpdate => "Confirm your Clothify profile change",
        }
    }
}

impl fmt::Display for OtpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(Self::Signup),
            "password-reset" => Ok(Self::PasswordReset),
            "profile-update" => Ok(Self::ProfileUpdate),
            other => Err(format!("Unknown OTP context: {other}")),
        }
    }
}

/// Change held by a ticket until its code is confirmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OtpPayload {
    /// Nothing to apply
    #[default]
    None,
    /// Pending sensitive profile change
    ProfileChange {
        /// New lower-cased email
        new_email: Option<String>,
        /// bcrypt hash of the new password
        new_password_hash: Option<String>,
        /// Delete the account instead of editing it
        delete_account: bool,
    },
}

/// Code handed back to the caller for delivery
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    /// Plain code, only ever mailed
    pub code: String,
    /// Expiry of the ticket
    pub expires_at: DateTime<Utc>,
}

/// Time source, injected so expiry and cooldown are deterministic in tests
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Start the clock at `start`
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map_or_else(|poisoned| *poisoned.into_inner(), |now| *now)
    }
}

/// Keyed store of OTP tickets
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Issue a ticket for `subject`, replacing any ticket it holds
    ///
    /// # Errors
    ///
    /// Returns a rate limit error while a ticket for the same context is
    /// inside its resend cooldown
    async fn issue(
        &self,
        subject: Uuid,
        context: OtpContext,
        payload: OtpPayload,
    ) -> AppResult<IssuedOtp>;

    /// Mint a fresh code for the live ticket of this context, keeping its payload
    ///
    /// Returns `None` when the subject holds no live ticket for the context.
    ///
    /// # Errors
    ///
    /// Returns a rate limit error inside the resend cooldown
    async fn refresh(&self, subject: Uuid, context: OtpContext) -> AppResult<Option<IssuedOtp>>;

    /// Check a code; on success the ticket is removed when `consume` is set
    ///
    /// # Errors
    ///
    /// Returns `OtpInvalid` for a missing, expired, mismatched or wrong code
    async fn verify(
        &self,
        subject: Uuid,
        context: OtpContext,
        code: &str,
        consume: bool,
    ) -> AppResult<OtpPayload>;

    /// Drop the subject's ticket, if any
    async fn discard(&self, subject: Uuid);

    /// Remove expired tickets, returning how many were dropped
    async fn purge_expired(&self) -> usize;
}

/// Generate a uniformly random six digit code
#[must_use]
pub fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{value:0width$}", width = OTP_DIGITS)
}
