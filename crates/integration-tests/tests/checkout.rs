//! Integration tests for checkout: stock movement, audit logging, and loyalty.
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

/// Test helper: create a product with the given stock and price.
async fn create_test_product(ctx: &TestContext, stock: i32, price: &str) -> Value {
    let sku = format!("IT-{}", Uuid::new_v4());
    let resp = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&json!({
            "name": format!("Checkout Widget {sku}"),
            "sku": sku,
            "price": price,
            "cost": "1.00",
            "stockQuantity": stock,
        }))
        .send()
        .await
        .expect("Failed to create test product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Response was not JSON")
}

/// Test helper: create a customer with zero loyalty points.
async fn create_test_customer(ctx: &TestContext) -> Value {
    let resp = ctx
        .client
        .post(ctx.url("/api/customers"))
        .json(&json!({
            "fullName": format!("Loyal Shopper {}", Uuid::new_v4()),
        }))
        .send()
        .await
        .expect("Failed to create test customer");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Response was not JSON")
}

/// Test helper: fetch current stock for a product.
async fn stock_of(ctx: &TestContext, id: i64) -> i64 {
    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);
    let product: Value = resp.json().await.expect("Response was not JSON");
    product["stockQuantity"].as_i64().expect("stockQuantity")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_decrements_stock_and_logs_each_line() {
    let ctx = TestContext::new();
    ctx.login().await;

    let first = create_test_product(&ctx, 10, "5.00").await;
    let second = create_test_product(&ctx, 8, "2.50").await;
    let first_id = first["id"].as_i64().expect("id");
    let second_id = second["id"].as_i64().expect("id");

    let resp = ctx
        .client
        .post(ctx.url("/api/sales"))
        .json(&json!({
            "items": [
                {"productId": first_id, "quantity": 3, "unitPrice": "5.00"},
                {"productId": second_id, "quantity": 2, "unitPrice": "2.50"},
            ],
            "paymentMethod": "CASH",
        }))
        .send()
        .await
        .expect("Failed to create sale");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let sale: Value = resp.json().await.expect("Response was not JSON");

    assert_eq!(sale["status"], "COMPLETED");
    assert_eq!(sale["items"].as_array().expect("items").len(), 2);

    // Stock moved for both products
    assert_eq!(stock_of(&ctx, first_id).await, 7);
    assert_eq!(stock_of(&ctx, second_id).await, 6);

    // One SALE audit row per line
    for (id, change, previous, new) in [(first_id, -3, 10, 7), (second_id, -2, 8, 6)] {
        let resp = ctx
            .client
            .get(ctx.url(&format!("/api/inventory/logs?productId={id}&action=SALE")))
            .send()
            .await
            .expect("Failed to list stock logs");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Response was not JSON");
        let logs = body["data"].as_array().expect("log array");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0]["quantityChange"], change);
        assert_eq!(logs[0]["previousStock"], previous);
        assert_eq!(logs[0]["newStock"], new);
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_rejects_insufficient_stock() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 2, "5.00").await;
    let id = product["id"].as_i64().expect("id");

    let resp = ctx
        .client
        .post(ctx.url("/api/sales"))
        .json(&json!({
            "items": [{"productId": id, "quantity": 5, "unitPrice": "5.00"}],
            "paymentMethod": "CASH",
        }))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Rolled back: stock unchanged
    assert_eq!(stock_of(&ctx, id).await, 2);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_rejects_empty_cart() {
    let ctx = TestContext::new();
    ctx.login().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/sales"))
        .json(&json!({
            "items": [],
            "paymentMethod": "CASH",
        }))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_accrues_loyalty_points() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 50, "10.00").await;
    let customer = create_test_customer(&ctx).await;
    let product_id = product["id"].as_i64().expect("id");
    let customer_id = customer["id"].as_i64().expect("id");
    assert_eq!(customer["loyaltyPoints"], 0);

    let resp = ctx
        .client
        .post(ctx.url("/api/sales"))
        .json(&json!({
            "items": [{"productId": product_id, "quantity": 2, "unitPrice": "10.00"}],
            "paymentMethod": "CARD",
            "customerId": customer_id,
        }))
        .send()
        .await
        .expect("Failed to create sale");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let sale: Value = resp.json().await.expect("Response was not JSON");
    let earned = sale["pointsEarned"].as_i64().expect("pointsEarned");
    assert!(earned > 0);

    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/customers/{customer_id}")))
        .send()
        .await
        .expect("Failed to get customer");
    assert_eq!(resp.status(), StatusCode::OK);
    let detail: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(detail["loyaltyPoints"].as_i64(), Some(earned));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_rejects_over_redemption() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 50, "10.00").await;
    let customer = create_test_customer(&ctx).await;
    let product_id = product["id"].as_i64().expect("id");
    let customer_id = customer["id"].as_i64().expect("id");

    // New customer has no points to redeem
    let resp = ctx
        .client
        .post(ctx.url("/api/sales"))
        .json(&json!({
            "items": [{"productId": product_id, "quantity": 1, "unitPrice": "10.00"}],
            "paymentMethod": "CASH",
            "customerId": customer_id,
            "pointsRedeemed": 100,
        }))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Rolled back: stock unchanged
    assert_eq!(stock_of(&ctx, product_id).await, 50);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_rejects_unknown_customer() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 5, "4.00").await;
    let product_id = product["id"].as_i64().expect("id");

    let resp = ctx
        .client
        .post(ctx.url("/api/sales"))
        .json(&json!({
            "items": [{"productId": product_id, "quantity": 1, "unitPrice": "4.00"}],
            "paymentMethod": "CASH",
            "customerId": 2_000_000_000,
        }))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Rolled back: stock unchanged
    assert_eq!(stock_of(&ctx, product_id).await, 5);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_rejects_redemption_without_customer() {
    let ctx = TestContext::new();
    ctx.login().await;

    let product = create_test_product(&ctx, 10, "10.00").await;
    let product_id = product["id"].as_i64().expect("id");

    let resp = ctx
        .client
        .post(ctx.url("/api/sales"))
        .json(&json!({
            "items": [{"productId": product_id, "quantity": 1, "unitPrice": "10.00"}],
            "paymentMethod": "CASH",
            "pointsRedeemed": 20,
        }))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sales_csv_export() {
    let ctx = TestContext::new();
    ctx.login().await;

    let resp = ctx
        .client
        .get(ctx.url("/api/sales/export"))
        .send()
        .await
        .expect("Failed to export sales");
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/csv"));

    let body = resp.text().await.expect("Failed to read CSV");
    assert!(body.starts_with("Sale ID,"));
}
