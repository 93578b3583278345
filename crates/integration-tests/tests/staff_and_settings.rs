//! Integration tests for staff accounts, store settings, and analytics.
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
use uuid::Uuid;

/// Test helper: create a STAFF account with a known password.
async fn create_test_staff(ctx: &TestContext, password: &str) -> Value {
    let email = format!("staff-{}@test.local", Uuid::new_v4());
    let resp = ctx
        .client
        .post(ctx.url("/api/users"))
        .json(&json!({
            "email": email,
            "password": password,
            "fullName": "Integration Staff",
            "role": "STAFF",
        }))
        .send()
        .await
        .expect("Failed to create staff account");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Response was not JSON")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_staff_create_and_delete() {
    let ctx = TestContext::new();
    ctx.login().await;

    let staff = create_test_staff(&ctx, "staff-password").await;
    let id = staff["id"].as_i64().expect("id");
    assert_eq!(staff["role"], "STAFF");
    // Password hash must never appear on the wire
    assert!(staff.get("password").is_none());
    assert!(staff.get("passwordHash").is_none());

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/api/users/{id}")))
        .send()
        .await
        .expect("Failed to delete staff account");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_email_rejected() {
    let ctx = TestContext::new();
    ctx.login().await;

    let staff = create_test_staff(&ctx, "staff-password").await;

    let resp = ctx
        .client
        .post(ctx.url("/api/users"))
        .json(&json!({
            "email": staff["email"],
            "password": "another-password",
            "fullName": "Duplicate",
            "role": "STAFF",
        }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cannot_delete_own_account() {
    let ctx = TestContext::new();
    let me = ctx.login().await;
    let id = me["id"].as_i64().expect("id");

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/api/users/{id}")))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cannot_delete_staff_with_sales() {
    let admin = TestContext::new();
    admin.login().await;

    let staff = create_test_staff(&admin, "staff-password").await;
    let staff_id = staff["id"].as_i64().expect("id");
    let staff_email = staff["email"].as_str().expect("email");

    // Create a product, then a sale rung up by the new staff member
    let sku = format!("IT-{}", Uuid::new_v4());
    let resp = admin
        .client
        .post(admin.url("/api/products"))
        .json(&json!({
            "name": "Staff Sale Widget",
            "sku": sku,
            "price": "3.00",
            "cost": "1.00",
            "stockQuantity": 5,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Response was not JSON");
    let product_id = product["id"].as_i64().expect("id");

    let staff_ctx = TestContext::new();
    let resp = staff_ctx
        .client
        .post(staff_ctx.url("/api/auth/login"))
        .json(&json!({"email": staff_email, "password": "staff-password"}))
        .send()
        .await
        .expect("Failed to log in as staff");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = staff_ctx
        .client
        .post(staff_ctx.url("/api/sales"))
        .json(&json!({
            "items": [{"productId": product_id, "quantity": 1, "unitPrice": "3.00"}],
            "paymentMethod": "CASH",
        }))
        .send()
        .await
        .expect("Failed to create sale");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // The staff member now has sales history and must not be deletable
    let resp = admin
        .client
        .delete(admin.url(&format!("/api/users/{staff_id}")))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_staff_cannot_manage_users() {
    let admin = TestContext::new();
    admin.login().await;
    let staff = create_test_staff(&admin, "staff-password").await;
    let staff_email = staff["email"].as_str().expect("email");

    let staff_ctx = TestContext::new();
    let resp = staff_ctx
        .client
        .post(staff_ctx.url("/api/auth/login"))
        .json(&json!({"email": staff_email, "password": "staff-password"}))
        .send()
        .await
        .expect("Failed to log in as staff");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = staff_ctx
        .client
        .post(staff_ctx.url("/api/users"))
        .json(&json!({
            "email": "intruder@test.local",
            "password": "whatever-password",
            "fullName": "Intruder",
            "role": "ADMIN",
        }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_settings_roundtrip() {
    let ctx = TestContext::new();
    ctx.login().await;

    // First read returns defaults (or whatever was last saved)
    let resp = ctx
        .client
        .get(ctx.url("/api/settings"))
        .send()
        .await
        .expect("Failed to get settings");
    assert_eq!(resp.status(), StatusCode::OK);
    let settings: Value = resp.json().await.expect("Response was not JSON");
    assert!(settings["storeName"].is_string());
    assert!(settings["taxRate"].is_string());

    let resp = ctx
        .client
        .put(ctx.url("/api/settings"))
        .json(&json!({
            "storeName": "Tillpoint Test Store",
            "currency": "USD",
            "taxRate": "8.25",
            "loyaltyRate": "1",
        }))
        .send()
        .await
        .expect("Failed to update settings");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(updated["storeName"], "Tillpoint Test Store");
    assert_eq!(updated["taxRate"], "8.25");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_settings_reject_negative_tax_rate() {
    let ctx = TestContext::new();
    ctx.login().await;

    let resp = ctx
        .client
        .put(ctx.url("/api/settings"))
        .json(&json!({
            "storeName": "Tillpoint Test Store",
            "currency": "USD",
            "taxRate": "-5",
            "loyaltyRate": "1",
        }))
        .send()
        .await
        .expect("Failed to send settings update");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_inventory_threshold_roundtrip() {
    let ctx = TestContext::new();
    ctx.login().await;

    let resp = ctx
        .client
        .put(ctx.url("/api/settings/inventory"))
        .json(&json!({"lowStockThreshold": 15}))
        .send()
        .await
        .expect("Failed to update threshold");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(ctx.url("/api/settings/inventory"))
        .send()
        .await
        .expect("Failed to get threshold");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(body["lowStockThreshold"], 15);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_analytics_overview_shape() {
    let ctx = TestContext::new();
    ctx.login().await;

    let resp = ctx
        .client
        .get(ctx.url("/api/analytics"))
        .send()
        .await
        .expect("Failed to get analytics");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Response was not JSON");

    // Seven daily buckets, oldest first, zero-filled
    let trend = body["salesTrend"].as_array().expect("salesTrend");
    assert_eq!(trend.len(), 7);
    assert!(body["topProducts"].is_array());
    assert!(body["paymentBreakdown"].is_array());
}
