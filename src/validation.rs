// ABOUTME: Request field validation shared by account, profile and contact handlers
// ABOUTME: Required-field, email-format and password-length checks returning client errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use clothify_core::constants::{limits, messages};
use clothify_core::errors::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Whether `email` looks like `local@domain.tld`
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(email))
}

/// Reject a malformed email address
///
/// # Errors
///
/// Returns `InvalidFormat` when the address does not match
pub fn validate_email(email: &str) -> AppResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::invalid_format(messages::INVALID_EMAIL))
    }
}

/// Reject a password below the minimum length
///
/// # Errors
///
/// Returns `InvalidInput` for short passwords
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < limits::MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(messages::PASSWORD_TOO_SHORT));
    }
    Ok(())
}

/// Return the trimmed value of a required field
///
/// # Errors
///
/// Returns `MissingRequiredField` with `message` when the field is absent or blank
pub fn required<'a>(value: Option<&'a str>, message: &str) -> AppResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing_field(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clothify_core::errors::ErrorCode;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("asha@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.in"));
        assert!(!is_valid_email("asha@example"));
        assert!(!is_valid_email("asha example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_password_length_counts_characters() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("पासवर्ड").is_ok());
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(Some("  hi "), "x").unwrap(), "hi");
        let err = required(Some("   "), messages::ALL_FIELDS_REQUIRED).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(err.message, messages::ALL_FIELDS_REQUIRED);
        assert!(required(None, "x").is_err());
    }
}
