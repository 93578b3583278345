//! Store settings models (singleton row).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The store-wide settings singleton.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub store_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub currency: String,
    /// Percentage applied to the discounted subtotal (10 means 10%).
    pub tax_rate: Decimal,
    /// Loyalty points earned per whole currency unit spent.
    pub loyalty_rate: Decimal,
    pub low_stock_threshold: i32,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by `PUT /api/settings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsInput {
    pub store_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub currency: String,
    pub tax_rate: Decimal,
    pub loyalty_rate: Decimal,
}

/// Fields accepted by `PUT /api/settings/inventory`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventorySettingsInput {
    pub low_stock_threshold: i32,
}
