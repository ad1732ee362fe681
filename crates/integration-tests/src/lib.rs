//! Integration tests for the Welcome Home site backend.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server (memory backend is fine)
//! cargo run -p welcome-home-server
//!
//! # Run integration tests
//! cargo test -p welcome-home-integration-tests -- --ignored
//! ```
//!
//! Tests target a live server named by `SERVER_BASE_URL`
//! (default `http://localhost:3000`) and are `#[ignore]`d so a plain
//! `cargo test` never needs one. Admin-gated flows also need
//! `ADMIN_PASSPHRASE` set to the server's value.

/// Base URL for the site API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SERVER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// The admin passphrase the running server was configured with.
#[must_use]
pub fn admin_passphrase() -> Option<String> {
    std::env::var("ADMIN_PASSPHRASE").ok()
}

/// Plain HTTP client for API tests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}
