//! Integration tests for the product catalog.
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

/// Test helper: create a product with a unique SKU and return it.
async fn create_test_product(ctx: &TestContext, stock: i32) -> Value {
    let sku = format!("IT-{}", Uuid::new_v4());
    let resp = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&json!({
            "name": format!("Integration Widget {sku}"),
            "sku": sku,
            "price": "9.99",
            "cost": "4.50",
            "stockQuantity": stock,
        }))
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Response was not JSON")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_crud() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 25).await;
    let id = product["id"].as_i64().expect("product id");
    assert_eq!(product["stockQuantity"], 25);
    assert_eq!(product["isActive"], true);

    // Detail
    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);

    // Update price and name
    let resp = ctx
        .client
        .put(ctx.url(&format!("/api/products/{id}")))
        .json(&json!({
            "name": "Renamed Widget",
            "sku": product["sku"],
            "price": "12.50",
            "cost": "4.50",
            "stockQuantity": 25,
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(updated["name"], "Renamed Widget");

    // Delete (no sales reference it, so it should be removed outright)
    let resp = ctx
        .client
        .delete(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(body["deactivated"], false);

    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_sku_rejected() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 5).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&json!({
            "name": "Copycat",
            "sku": product["sku"],
            "price": "1.00",
            "cost": "0.50",
        }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_stock_update_writes_audit_log() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 10).await;
    let id = product["id"].as_i64().expect("product id");

    // Raise stock with a restock reason
    let resp = ctx
        .client
        .put(ctx.url(&format!("/api/products/{id}")))
        .json(&json!({
            "name": product["name"],
            "sku": product["sku"],
            "price": "9.99",
            "cost": "4.50",
            "stockQuantity": 30,
            "stockReason": "Received weekly delivery",
        }))
        .send()
        .await
        .expect("Failed to update stock");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(updated["stockQuantity"], 30);

    // The audit log should have a RESTOCK entry for this product
    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/inventory/logs?productId={id}")))
        .send()
        .await
        .expect("Failed to list stock logs");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Response was not JSON");
    let logs = body["data"].as_array().expect("log array");
    assert!(!logs.is_empty());
    assert_eq!(logs[0]["action"], "RESTOCK");
    assert_eq!(logs[0]["quantityChange"], 20);
    assert_eq!(logs[0]["previousStock"], 10);
    assert_eq!(logs[0]["newStock"], 30);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_negative_stock_clamped_to_zero() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 3).await;
    let id = product["id"].as_i64().expect("product id");

    let resp = ctx
        .client
        .put(ctx.url(&format!("/api/products/{id}")))
        .json(&json!({
            "name": product["name"],
            "sku": product["sku"],
            "price": "9.99",
            "cost": "4.50",
            "stockQuantity": -7,
            "stockReason": "Stolen during break-in",
        }))
        .send()
        .await
        .expect("Failed to update stock");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(updated["stockQuantity"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_pagination_envelope() {
    let ctx = TestContext::new();
    ctx.login().await;

    // Ensure at least 3 products exist
    for _ in 0..3 {
        create_test_product(&ctx, 1).await;
    }

    let resp = ctx
        .client
        .get(ctx.url("/api/products?page=1&limit=2"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Response was not JSON");

    let data = body["data"].as_array().expect("data array");
    assert!(data.len() <= 2);

    let pagination = &body["pagination"];
    assert_eq!(pagination["page"], 1);
    assert_eq!(pagination["limit"], 2);
    let total = pagination["total"].as_i64().expect("total");
    let total_pages = pagination["totalPages"].as_i64().expect("totalPages");
    assert_eq!(total_pages, (total + 1) / 2, "totalPages must round up");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_search_filter() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 1).await;
    let sku = product["sku"].as_str().expect("sku");

    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/products?search={sku}")))
        .send()
        .await
        .expect("Failed to search products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Response was not JSON");
    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["sku"], *sku);
}
