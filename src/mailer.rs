// ABOUTME: Outbound email for OTP codes and contact/support messages
// ABOUTME: SMTP delivery through lettre, with logging and capturing mailers for development and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Mail Delivery
//!
//! Handlers depend on the [`Mailer`] trait only. Production uses
//! [`SmtpMailer`]; without SMTP settings the server falls back to
//! [`LogMailer`], which writes the message to the log instead.

use crate::config::MailConfig;
use crate::otp::OtpContext;
use async_trait::async_trait;
use clothify_core::constants::{time, MAIL_FROM_NAME};
use clothify_core::errors::{AppError, AppResult};
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info};

/// Port on which SMTP speaks implicit TLS; other ports use STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP connection timeout
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text: String,
    /// Optional HTML alternative
    pub html: Option<String>,
}

impl OutgoingMail {
    /// Plain text message
    #[must_use]
    pub fn text(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    /// Message carrying a one-time passcode
    #[must_use]
    pub fn otp(to: &str, context: OtpContext, code: &str) -> Self {
        let minutes = time::OTP_TTL_SECS / 60;
        let text = format!(
            "Your Clothify verification code is {code}. It expires in {minutes} minutes. \
             If you did not request this, you can ignore this email."
        );
        let html = format!(
            "<p>Your Clothify verification code is <strong>{code}</strong>.</p>\
             <p>It expires in {minutes} minutes. If you did not request this, you can ignore this email.</p>"
        );
        Self {
            to: to.to_owned(),
            subject: context.mail_subject().to_owned(),
            text,
            html: Some(html),
        }
    }
}

/// Mail delivery seam
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    ///
    /// # Errors
    ///
    /// Returns a mail delivery error if the relay rejects the message
    async fn send(&self, mail: OutgoingMail) -> AppResult<()>;
}

/// SMTP relay mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from SMTP settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the host or sender address is invalid
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| AppError::config(format!("Invalid SMTP host '{}': {e}", config.host)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        let address = config
            .from_address
            .parse::<Address>()
            .map_err(|e| AppError::config(format!("Invalid EMAIL_FROM address: {e}")))?;
        let from = Mailbox::new(Some(MAIL_FROM_NAME.to_owned()), address);

        Ok(Self { transport, from })
    }

    fn build_message(&self, mail: &OutgoingMail) -> AppResult<Message> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::invalid_format(format!("Invalid recipient address: {e}")))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone());

        let message = match &mail.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                mail.text.clone(),
                html.clone(),
            )),
            None => builder.singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(mail.text.clone()),
            ),
        };
        message.map_err(|e| AppError::mail(format!("Failed to build email: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        let message = self.build_message(&mail)?;
        self.transport.send(message).await.map_err(|e| {
            error!(to = %mail.to, subject = %mail.subject, "Email send failed: {e}");
            AppError::mail(format!("Failed to send email: {e}"))
        })?;
        info!(to = %mail.to, subject = %mail.subject, "Email sent");
        Ok(())
    }
}

/// Mailer that writes messages to the log instead of delivering them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.text,
            "SMTP not configured, logging email instead of sending"
        );
        Ok(())
    }
}

/// Mailer that keeps every message in memory
#[derive(Debug, Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl CapturingMailer {
    /// Create an empty capturing mailer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Most recent message addressed to `to`
    #[must_use]
    pub fn last_to(&self, to: &str) -> Option<OutgoingMail> {
        self.sent().into_iter().rev().find(|mail| mail.to == to)
    }

    /// Six digit code in the most recent message addressed to `to`
    #[must_use]
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        let mail = self.last_to(to)?;
        mail.text
            .split(|c: char| !c.is_ascii_digit())
            .find(|run| run.len() == crate::otp::OTP_DIGITS)
            .map(str::to_owned)
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail);
        }
        Ok(())
    }
}
