// ABOUTME: Security primitives shared by routes and middleware
// ABOUTME: Cookie parsing and building, and the server-held CSRF token store

/// Cookie helpers for the session and CSRF cookies
pub mod cookies;
/// CSRF token generation and validation
pub mod csrf;
