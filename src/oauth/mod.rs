// ABOUTME: OAuth module for third-party sign-in
// ABOUTME: Google authorization-code flow with profile lookup

/// Google sign-in client
pub mod google;

pub use google::{GoogleOAuthClient, GoogleProfile};
