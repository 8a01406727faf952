// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Durations, limits, cookie names and user-facing messages for Clothify
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// API endpoints
pub mod endpoints {
    /// API base path every route is mounted under
    pub const API_BASE: &str = "/api";
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 3000;
}

/// Account validation limits
pub mod limits {
    /// Minimum password length in characters
    pub const MIN_PASSWORD_LENGTH: usize = 6;
    /// Maximum accepted JSON body size in bytes
    pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
}

/// Time-related constants, in seconds unless stated otherwise
pub mod time {
    /// Session token lifetime (7 days)
    pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;
    /// One-time code lifetime (10 minutes)
    pub const OTP_TTL_SECS: i64 = 10 * 60;
    /// Minimum gap between two code deliveries for one subject
    pub const OTP_RESEND_COOLDOWN_SECS: i64 = 120;
    /// Interval of the background sweep over expired codes
    pub const OTP_SWEEP_INTERVAL_SECS: u64 = 60;
    /// CSRF token lifetime (24 hours)
    pub const CSRF_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
    /// Age after which a single-message conversation counts as abandoned
    pub const ABANDONED_CONVERSATION_SECS: i64 = 5 * 60;
    /// Rate limiting window (15 minutes)
    pub const RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
}

/// Cookie and header names shared with the frontend
pub mod cookies {
    /// Session token cookie
    pub const SESSION_COOKIE: &str = "jwt";
    /// Readable CSRF mirror cookie
    pub const CSRF_COOKIE: &str = "XSRF-TOKEN";
    /// Request header carrying the CSRF token
    pub const CSRF_HEADER: &str = "x-csrf-token";
    /// OAuth `state` round-tripped through Google's consent page
    pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
    /// Lifetime of the OAuth state cookie
    pub const OAUTH_STATE_TTL_SECS: i64 = 10 * 60;
}

/// Issuer claim written into session tokens
pub const JWT_ISSUER: &str = "clothify-auth";

/// Display name used in outbound mail
pub const MAIL_FROM_NAME: &str = "Clothify 👕";

/// User-facing messages
pub mod messages {
    /// Returned when the assistant receives no messages
    pub const EMPTY_MESSAGES: &str = "Kuch toh bol do, yaar! No message, no magic.";
    /// Returned for any non-recoverable assistant failure
    pub const TECHNICAL_ISSUE: &str = "Oops! Thoda technical issue hai. Try again? 🙏";
    /// Login failure, deliberately identical for unknown email and wrong password
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    /// Signup or profile validation
    pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
    /// Password policy violation
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
    /// Email regex failure
    pub const INVALID_EMAIL: &str = "Invalid email format";
    /// Duplicate signup email
    pub const EMAIL_EXISTS: &str = "Email already exists, please use a different one";
    /// Duplicate email on profile change
    pub const EMAIL_IN_USE: &str = "Email already in use";
    /// Login attempted before the email was verified
    pub const ACCOUNT_UNVERIFIED: &str = "Please verify your email before logging in";
    /// Session for an account that no longer exists
    pub const USER_NOT_FOUND: &str = "User not found";
    /// Conversation ownership violation
    pub const CONVERSATION_FORBIDDEN: &str = "Unauthorized to access this conversation";
    /// Subject of contact-form mail without a caller subject
    pub const CONTACT_DEFAULT_SUBJECT: &str = "Message from Clothify Contact Form";
    /// Subject of support mail
    pub const SUPPORT_SUBJECT: &str = "Clothify Support Request";
    /// Contact or support form without email or body
    pub const EMAIL_AND_MESSAGE_REQUIRED: &str = "Email and message are required";
    /// Contact form delivered
    pub const MESSAGE_SENT: &str = "Message sent successfully";
    /// Contact or support mail could not be delivered
    pub const MESSAGE_FAILED: &str = "Failed to send message";
    /// Support request delivered
    pub const SUPPORT_SENT: &str = "Support request sent successfully";
    /// Signup accepted, waiting for the code
    pub const SIGNUP_OTP_SENT: &str =
        "User registered successfully. Please verify the OTP sent to your email";
    /// A code was mailed
    pub const OTP_SENT: &str = "OTP sent to your email";
    /// Signup code accepted
    pub const EMAIL_VERIFIED: &str = "Email verified successfully";
    /// Password-reset code checked without consuming it
    pub const OTP_VERIFIED: &str = "OTP verified successfully";
    /// Resend requested for a verified account
    pub const ALREADY_VERIFIED: &str = "Account is already verified";
    /// Profile-update resend without a pending change
    pub const NO_PENDING_CHANGE: &str = "No pending profile change, please submit it again";
    /// Unknown or malformed OTP context
    pub const INVALID_OTP_CONTEXT: &str = "Invalid OTP context";
    /// Unknown or malformed user id in an OTP request
    pub const INVALID_USER_ID: &str = "Invalid user id";
    /// Password changed through the reset flow
    pub const PASSWORD_RESET: &str = "Password reset successful";
    /// Profile changed
    pub const PROFILE_UPDATED: &str = "Profile updated successfully";
    /// Sensitive profile change waiting for the code
    pub const PROFILE_OTP_REQUIRED: &str =
        "Please verify the OTP sent to your email to confirm the change";
    /// Profile request with nothing to change
    pub const NO_PROFILE_CHANGES: &str = "No changes provided";
    /// Account removed
    pub const ACCOUNT_DELETED: &str = "Account deleted successfully";
    /// Session ended
    pub const LOGOUT: &str = "Logout successful";
    /// Conversation removed
    pub const CONVERSATION_DELETED: &str = "Conversation deleted successfully";
    /// New conversation without content
    pub const INITIAL_MESSAGE_REQUIRED: &str = "Initial message content is required";
    /// Appended message without content
    pub const MESSAGE_CONTENT_REQUIRED: &str = "Message content is required";
    /// Conversation message role other than user or assistant
    pub const INVALID_MESSAGE_ROLE: &str = "Message role must be user or assistant";
}
