//! Store settings repository (singleton row, id = 1).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::settings::{StoreSettings, UpdateSettingsInput};

const SELECT_COLUMNS: &str = "store_name, address, phone, email, currency, tax_rate, \
     loyalty_rate, low_stock_threshold, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    store_name: String,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    currency: String,
    tax_rate: Decimal,
    loyalty_rate: Decimal,
    low_stock_threshold: i32,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for StoreSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            store_name: row.store_name,
            address: row.address,
            phone: row.phone,
            email: row.email,
            currency: row.currency,
            tax_rate: row.tax_rate,
            loyalty_rate: row.loyalty_rate,
            low_stock_threshold: row.low_stock_threshold,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for the store settings singleton.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the settings row, inserting column defaults on first read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_init(&self) -> Result<StoreSettings, RepositoryError> {
        sqlx::query("INSERT INTO store_settings (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
            .execute(self.pool)
            .await?;

        let row = sqlx::query_as::<_, SettingsRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM store_settings WHERE id = 1"
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update the store-facing settings fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        input: &UpdateSettingsInput,
    ) -> Result<StoreSettings, RepositoryError> {
        // Ensure the row exists before updating it
        self.get_or_init().await?;

        let row = sqlx::query_as::<_, SettingsRow>(&format!(
            "UPDATE store_settings
             SET store_name = $1, address = $2, phone = $3, email = $4,
                 currency = $5, tax_rate = $6, loyalty_rate = $7
             WHERE id = 1
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&input.store_name)
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(&input.currency)
        .bind(input.tax_rate)
        .bind(input.loyalty_rate)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update only the low-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_low_stock_threshold(
        &self,
        threshold: i32,
    ) -> Result<StoreSettings, RepositoryError> {
        self.get_or_init().await?;

        let row = sqlx::query_as::<_, SettingsRow>(&format!(
            "UPDATE store_settings
             SET low_stock_threshold = $1
             WHERE id = 1
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(threshold)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
