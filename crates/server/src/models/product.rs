//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tillpoint_core::{CategoryId, ProductId};

/// A catalog product with its current stock level.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    #[serde(default)]
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Fields accepted when updating a product.
///
/// A changed `stock_quantity` produces a stock log entry; `stock_reason`
/// determines the logged action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub is_active: Option<bool>,
    pub stock_reason: Option<String>,
}

/// Listing filters for `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Case-insensitive match on name, SKU, or barcode.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub active: Option<bool>,
    /// When true, only products at or below the configured low-stock threshold.
    #[serde(default)]
    pub low_stock: bool,
}

/// Outcome of a product delete request.
///
/// Products referenced by sales are deactivated instead of removed so
/// historical sale lines keep their product link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductRemoval {
    Deleted,
    Deactivated,
}
