//! Database operations for the POS `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `app_user` - Staff accounts (ADMIN / STAFF)
//! - `session` - Session storage (tower-sessions)
//! - `category` / `product` - Product catalog
//! - `customer` - Customers and loyalty point balances
//! - `sale` / `sale_item` - Sales and their line items
//! - `stock_log` - Audit trail of every stock change
//! - `store_settings` - Singleton settings row
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p tillpoint-cli -- migrate
//! ```

pub mod analytics;
pub mod categories;
pub mod customers;
pub mod products;
pub mod sales;
pub mod settings;
pub mod stock_logs;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use categories::CategoryRepository;
pub use customers::CustomerRepository;
pub use products::ProductRepository;
pub use sales::SaleRepository;
pub use settings::SettingsRepository;
pub use stock_logs::StockLogRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into `Conflict`.
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
