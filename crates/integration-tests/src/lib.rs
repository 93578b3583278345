//! Integration tests for Tillpoint.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p tillpoint-cli -- migrate
//!
//! # Create the test admin account
//! cargo run -p tillpoint-cli -- user create \
//!     -e admin@test.local -n "Test Admin" -p "test-password" -r admin
//!
//! # Start the server, then run the ignored tests
//! cargo run -p tillpoint-server &
//! cargo test -p tillpoint-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Login, logout, and session tests
//! - `products` - Catalog CRUD and pagination tests
//! - `checkout` - Sale creation, stock, and loyalty tests
//! - `staff_and_settings` - Staff account and store settings tests
//!
//! # Environment Variables
//!
//! - `TILLPOINT_BASE_URL` - Server base URL (default `http://localhost:3000`)
//! - `TILLPOINT_TEST_EMAIL` - Admin email for login (default `admin@test.local`)
//! - `TILLPOINT_TEST_PASSWORD` - Admin password (default `test-password`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};

/// Shared context for API integration tests.
///
/// Holds a cookie-aware HTTP client so the session established by
/// [`TestContext::login`] carries across requests.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Build a context pointed at the server under test.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("TILLPOINT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, base_url }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in as the configured test admin and return the session user.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails or is rejected.
    pub async fn login(&self) -> Value {
        let email = std::env::var("TILLPOINT_TEST_EMAIL")
            .unwrap_or_else(|_| "admin@test.local".to_owned());
        let password = std::env::var("TILLPOINT_TEST_PASSWORD")
            .unwrap_or_else(|_| "test-password".to_owned());

        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .expect("Failed to send login request");

        assert!(
            resp.status().is_success(),
            "Login failed with status {}; create the test admin first",
            resp.status()
        );
        resp.json().await.expect("Login response was not JSON")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
