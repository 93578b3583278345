//! Integration tests for login, logout, and session handling.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p tillpoint-server)
//! - A test admin account (see crate docs)
//!
//! Run with: cargo test -p tillpoint-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use tillpoint_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_establishes_session() {
    let ctx = TestContext::new();
    let user = ctx.login().await;

    assert!(user["id"].is_number());
    assert!(user["email"].is_string());
    assert_eq!(user["role"], "ADMIN");

    // The session cookie should now authenticate /me
    let resp = ctx
        .client
        .get(ctx.url("/api/auth/me"))
        .send()
        .await
        .expect("Failed to get current user");

    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(me["id"], user["id"]);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.url("/api/auth/login"))
        .json(&json!({"email": "admin@test.local", "password": "wrong-password"}))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Response was not JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unauthenticated_requests_rejected() {
    // Fresh client, no session
    let ctx = TestContext::new();

    for path in ["/api/auth/me", "/api/products", "/api/sales", "/api/settings"] {
        let resp = ctx
            .client
            .get(ctx.url(path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "expected 401 for {path}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_logout_clears_session() {
    let ctx = TestContext::new();
    ctx.login().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx
        .client
        .get(ctx.url("/api/auth/me"))
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health_endpoints() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("Failed to check health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("Failed to check readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}
