//! Staff account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tillpoint_core::{Email, UserId, UserRole};

/// A staff account. The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    pub role: UserRole,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a staff account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
    pub image_url: Option<String>,
}

/// Fields accepted when updating a staff account.
///
/// `password` is optional; when absent the stored hash is kept.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub image_url: Option<String>,
    pub password: Option<String>,
}
