//! Product category models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tillpoint_core::CategoryId;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}
