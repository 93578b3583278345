//! Sale and checkout models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tillpoint_core::{CustomerId, PaymentMethod, ProductId, SaleId, SaleItemId, SaleStatus, UserId};

/// A completed (or refunded/cancelled) sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub user_id: UserId,
    pub customer_id: Option<CustomerId>,
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub points_redeemed: i32,
    pub points_earned: i32,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
}

/// A sale line item joined with its product's name and SKU.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: SaleItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_amount: Decimal,
    pub subtotal: Decimal,
}

/// A sale with its line items and the display names of cashier and customer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub cashier_name: String,
    pub customer_name: Option<String>,
    pub items: Vec<SaleItem>,
}

/// One requested cart line in a checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineInput {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
}

/// Checkout request body for `POST /api/sales`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub items: Vec<SaleLineInput>,
    #[serde(default)]
    pub discount_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub points_redeemed: i32,
}

/// Listing filters for `GET /api/sales`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFilter {
    /// Exact sale id or case-insensitive customer name match.
    pub search: Option<String>,
    pub user_id: Option<UserId>,
    /// Inclusive lower bound, `YYYY-MM-DD` or RFC 3339.
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD` or RFC 3339.
    pub end_date: Option<String>,
}
