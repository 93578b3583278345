//! Customer and loyalty models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tillpoint_core::CustomerId;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub loyalty_points: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a customer.
///
/// Loyalty points are never set directly; they change only through sales.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Listing filters for `GET /api/customers`.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerFilter {
    /// Case-insensitive match on name, email, or phone.
    pub search: Option<String>,
}
