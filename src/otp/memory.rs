// ABOUTME: Process-local OTP store backed by a RwLock-protected map
// ABOUTME: Hashes codes at rest and runs a background sweep for expired tickets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use super::{generate_code, Clock, IssuedOtp, OtpContext, OtpPayload, OtpStore, MAX_OTP_ATTEMPTS};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use clothify_core::constants::time;
use clothify_core::errors::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct OtpTicket {
    code_hash: [u8; 32],
    context: OtpContext,
    expires_at: DateTime<Utc>,
    last_sent_at: DateTime<Utc>,
    attempts: u32,
    payload: OtpPayload,
}

impl OtpTicket {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

type TicketMap = Arc<RwLock<HashMap<Uuid, OtpTicket>>>;

/// In-memory [`OtpStore`]
///
/// Tickets live in an `Arc<RwLock<HashMap>>` shared with the sweep task so
/// expired entries are dropped even when nobody asks for them again.
#[derive(Clone)]
pub struct InMemoryOtpStore {
    tickets: TicketMap,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cooldown: Duration,
    shutdown_tx: Option<Arc<mpsc::Sender<()>>>,
}

impl InMemoryOtpStore {
    /// Create a store with the standard ten minute expiry and two minute cooldown
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets: Arc::new(RwLock::new(HashMap::new())),
            clock,
            ttl: Duration::seconds(time::OTP_TTL_SECS),
            cooldown: Duration::seconds(time::OTP_RESEND_COOLDOWN_SECS),
            shutdown_tx: None,
        }
    }

    /// Create a store and spawn a sweep that runs every `interval`
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn with_sweeper(clock: Arc<dyn Clock>, interval: std::time::Duration) -> Self {
        let mut store = Self::new(clock);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let sweeper = store.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        sweeper.purge_expired().await;
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("OTP sweep task received shutdown signal");
                        break;
                    }
                }
            }
        });

        store.shutdown_tx = Some(Arc::new(shutdown_tx));
        store
    }

    /// Stop the background sweep, if one is running
    pub async fn shutdown(&self) {
        if let Some(tx) = &self.shutdown_tx {
            let _ = tx.send(()).await;
        }
    }

    fn hash_code(code: &str) -> [u8; 32] {
        Sha256::digest(code.trim().as_bytes()).into()
    }

    fn new_ticket(&self, now: DateTime<Utc>, context: OtpContext, payload: OtpPayload) -> (OtpTicket, IssuedOtp) {
        let code = generate_code();
        let expires_at = now + self.ttl;
        let ticket = OtpTicket {
            code_hash: Self::hash_code(&code),
            context,
            expires_at,
            last_sent_at: now,
            attempts: 0,
            payload,
        };
        (ticket, IssuedOtp { code, expires_at })
    }

    fn check_cooldown(&self, ticket: &OtpTicket, now: DateTime<Utc>) -> AppResult<()> {
        let ready_at = ticket.last_sent_at + self.cooldown;
        if now < ready_at {
            let millis = (ready_at - now).num_milliseconds();
            let wait = u64::try_from((millis + 999) / 1000).unwrap_or(1).max(1);
            return Err(AppError::rate_limit_exceeded(
                format!("Please wait {wait} seconds before requesting a new OTP"),
                wait,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn issue(
        &self,
        subject: Uuid,
        context: OtpContext,
        payload: OtpPayload,
    ) -> AppResult<IssuedOtp> {
        let now = self.clock.now();
        let mut tickets = self.tickets.write().await;

        if let Some(existing) = tickets.get(&subject) {
            if existing.context == context && !existing.is_expired(now) {
                self.check_cooldown(existing, now)?;
            }
        }

        let (ticket, issued) = self.new_ticket(now, context, payload);
        tickets.insert(subject, ticket);
        drop(tickets);

        debug!(subject = %subject, context = %context, "Issued OTP");
        Ok(issued)
    }

    async fn refresh(&self, subject: Uuid, context: OtpContext) -> AppResult<Option<IssuedOtp>> {
        let now = self.clock.now();
        let mut tickets = self.tickets.write().await;

        let Some(existing) = tickets.get(&subject) else {
            return Ok(None);
        };
        if existing.context != context || existing.is_expired(now) {
            return Ok(None);
        }
        self.check_cooldown(existing, now)?;

        let (ticket, issued) = self.new_ticket(now, context, existing.payload.clone());
        tickets.insert(subject, ticket);
        drop(tickets);

        debug!(subject = %subject, context = %context, "Refreshed OTP");
        Ok(Some(issued))
    }

    async fn verify(
        &self,
        subject: Uuid,
        context: OtpContext,
        code: &str,
        consume: bool,
    ) -> AppResult<OtpPayload> {
        let now = self.clock.now();
        let mut tickets = self.tickets.write().await;

        let Some(ticket) = tickets.get_mut(&subject) else {
            return Err(AppError::otp_invalid("Invalid or expired OTP"));
        };
        if ticket.context != context {
            return Err(AppError::otp_invalid("Invalid or expired OTP"));
        }
        if ticket.is_expired(now) {
            tickets.remove(&subject);
            return Err(AppError::otp_invalid("OTP has expired, please request a new one"));
        }

        let presented = Self::hash_code(code);
        if !bool::from(presented.ct_eq(&ticket.code_hash)) {
            ticket.attempts += 1;
            if ticket.attempts >= MAX_OTP_ATTEMPTS {
                tickets.remove(&subject);
                debug!(subject = %subject, "OTP discarded after too many attempts");
            }
            return Err(AppError::otp_invalid("Invalid OTP"));
        }

        let payload = if consume {
            tickets
                .remove(&subject)
                .map(|t| t.payload)
                .unwrap_or_default()
        } else {
            ticket.payload.clone()
        };
        Ok(payload)
    }

    async fn discard(&self, subject: Uuid) {
        self.tickets.write().await.remove(&subject);
    }

    async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut tickets = self.tickets.write().await;
        let before = tickets.len();
        tickets.retain(|_, ticket| !ticket.is_expired(now));
        let removed = before - tickets.len();
        drop(tickets);

        if removed > 0 {
            debug!("Swept {removed} expired OTP tickets");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::ManualClock;
    use clothify_core::errors::ErrorCode;

    fn store() -> (Arc<ManualClock>, InMemoryOtpStore) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = InMemoryOtpStore::new(clock.clone());
        (clock, store)
    }

    #[tokio::test]
    async fn test_correct_code_verifies_once() {
        let (_, store) = store();
        let subject = Uuid::new_v4();

        let issued = store
            .issue(subject, OtpContext::Signup, OtpPayload::None)
            .await
            .unwrap();
        store
            .verify(subject, OtpContext::Signup, &issued.code, true)
            .await
            .unwrap();

        let reused = store
            .verify(subject, OtpContext::Signup, &issued.code, true)
            .await
            .unwrap_err();
        assert_eq!(reused.code, ErrorCode::OtpInvalid);
    }

    #[tokio::test]
    async fn test_expired_after_ten_minutes() {
        let (clock, store) = store();
        let subject = Uuid::new_v4();

        let issued = store
            .issue(subject, OtpContext::PasswordReset, OtpPayload::None)
            .await
            .unwrap();
        clock.advance(Duration::seconds(601));

        let err = store
            .verify(subject, OtpContext::PasswordReset, &issued.code, true)
            .await
            .unwrap_err();
        assert!(err.message.contains("expired"));
    }

    #[tokio::test]
    async fn test_cooldown_blocks_second_request() {
        let (clock, store) = store();
        let subject = Uuid::new_v4();

        store
            .issue(subject, OtpContext::Signup, OtpPayload::None)
            .await
            .unwrap();
        clock.advance(Duration::seconds(30));

        let err = store
            .issue(subject, OtpContext::Signup, OtpPayload::None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimitExceeded);
        assert_eq!(err.message, "Please wait 90 seconds before requesting a new OTP");
        assert_eq!(err.retry_after_secs, Some(90));

        let refresh = store.refresh(subject, OtpContext::Signup).await.unwrap_err();
        assert_eq!(refresh.code, ErrorCode::RateLimitExceeded);

        clock.advance(Duration::seconds(90));
        assert!(store.refresh(subject, OtpContext::Signup).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_new_context_replaces_ticket() {
        let (_, store) = store();
        let subject = Uuid::new_v4();

        let signup = store
            .issue(subject, OtpContext::Signup, OtpPayload::None)
            .await
            .unwrap();
        let reset = store
            .issue(subject, OtpContext::PasswordReset, OtpPayload::None)
            .await
            .unwrap();

        assert!(store
            .verify(subject, OtpContext::Signup, &signup.code, true)
            .await
            .is_err());
        store
            .verify(subject, OtpContext::PasswordReset, &reset.code, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_consuming_check_keeps_ticket_and_payload() {
        let (_, store) = store();
        let subject = Uuid::new_v4();
        let payload = OtpPayload::ProfileChange {
            new_email: Some("new@example.com".into()),
            new_password_hash: None,
            delete_account: false,
        };

        let issued = store
            .issue(subject, OtpContext::ProfileUpdate, payload.clone())
            .await
            .unwrap();

        let peeked = store
            .verify(subject, OtpContext::ProfileUpdate, &issued.code, false)
            .await
            .unwrap();
        let taken = store
            .verify(subject, OtpContext::ProfileUpdate, &issued.code, true)
            .await
            .unwrap();
        assert_eq!(peeked, payload);
        assert_eq!(taken, payload);
    }

    #[tokio::test]
    async fn test_refresh_keeps_payload_and_changes_code() {
        let (clock, store) = store();
        let subject = Uuid::new_v4();
        let payload = OtpPayload::ProfileChange {
            new_email: None,
            new_password_hash: None,
            delete_account: true,
        };

        let first = store
            .issue(subject, OtpContext::ProfileUpdate, payload.clone())
            .await
            .unwrap();
        clock.advance(Duration::seconds(121));
        let second = store
            .refresh(subject, OtpContext::ProfileUpdate)
            .await
            .unwrap()
            .unwrap();

        if first.code != second.code {
            assert!(store
                .verify(subject, OtpContext::ProfileUpdate, &first.code, false)
                .await
                .is_err());
        }
        let got = store
            .verify(subject, OtpContext::ProfileUpdate, &second.code, true)
            .await
            .unwrap();
        assert_eq!(got, payload);
    }

    #[tokio::test]
    async fn test_too_many_wrong_guesses_discard_ticket() {
        let (_, store) = store();
        let subject = Uuid::new_v4();
        let issued = store
            .issue(subject, OtpContext::Signup, OtpPayload::None)
            .await
            .unwrap();
        let wrong = if issued.code == "000000" { "111111" } else { "000000" };

        for _ in 0..MAX_OTP_ATTEMPTS {
            assert!(store
                .verify(subject, OtpContext::Signup, wrong, true)
                .await
                .is_err());
        }
        assert!(store
            .verify(subject, OtpContext::Signup, &issued.code, true)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (clock, store) = store();
        store
            .issue(Uuid::new_v4(), OtpContext::Signup, OtpPayload::None)
            .await
            .unwrap();
        assert_eq!(store.purge_expired().await, 0);

        clock.advance(Duration::seconds(time::OTP_TTL_SECS));
        assert_eq!(store.purge_expired().await, 1);
    }
}
