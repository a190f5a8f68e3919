//! Integration tests for Botica.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the pharmacy backend (external), then the frontends:
//! cargo run -p botica-storefront
//! cargo run -p botica-admin
//!
//! # Run integration tests
//! cargo test -p botica-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Session cart flows (HTMX fragments)
//! - `storefront_checkout` - Checkout wizard progression
//! - `admin_crud` - Admin list pages and exports
//!
//! Base URLs are configurable via `STOREFRONT_BASE_URL` and
//! `ADMIN_BASE_URL`; they default to the local dev ports.

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client with a cookie store, so the session survives
/// across requests like a browser's would.
#[must_use]
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
