//! Stock audit log repository.
//!
//! Rows are only ever inserted from inside another operation's transaction
//! (product stock adjustments and checkout), so `insert` takes the open
//! transaction instead of the pool.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use tillpoint_core::{ProductId, StockAction, StockLogId, UserId};

use super::RepositoryError;
use crate::models::stock_log::{NewStockLog, StockLogEntry, StockLogFilter};
use crate::pagination::PageQuery;

const SELECT_JOINED: &str = "l.id, l.product_id, p.name AS product_name, p.sku, \
     l.user_id, u.full_name AS user_name, l.action, l.quantity_change, \
     l.previous_stock, l.new_stock, l.reason, l.created_at";

const LIST_FILTER: &str = "($1::int4 IS NULL OR l.product_id = $1) \
     AND ($2::text IS NULL OR l.action = $2)";

#[derive(Debug, sqlx::FromRow)]
struct StockLogRow {
    id: i32,
    product_id: i32,
    product_name: String,
    sku: String,
    user_id: Option<i32>,
    user_name: Option<String>,
    action: String,
    quantity_change: i32,
    previous_stock: i32,
    new_stock: i32,
    reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StockLogRow> for StockLogEntry {
    type Error = RepositoryError;

    fn try_from(row: StockLogRow) -> Result<Self, Self::Error> {
        let action: StockAction = row.action.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid stock action in database: {e}"))
        })?;

        Ok(Self {
            id: StockLogId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            sku: row.sku,
            user_id: row.user_id.map(UserId::new),
            user_name: row.user_name,
            action,
            quantity_change: row.quantity_change,
            previous_stock: row.previous_stock,
            new_stock: row.new_stock,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

/// Insert a stock log row inside an open transaction.
pub(crate) async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    log: &NewStockLog<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO stock_log
             (product_id, user_id, action, quantity_change,
              previous_stock, new_stock, reason)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(log.product_id.as_i32())
    .bind(log.user_id.map(|u| u.as_i32()))
    .bind(log.action.as_str())
    .bind(log.quantity_change)
    .bind(log.previous_stock)
    .bind(log.new_stock)
    .bind(log.reason)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Repository for reading the stock audit log.
pub struct StockLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StockLogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List stock log entries matching the filter, newest first, with the
    /// total row count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored action is invalid.
    pub async fn list(
        &self,
        filter: &StockLogFilter,
        page: &PageQuery,
    ) -> Result<(Vec<StockLogEntry>, i64), RepositoryError> {
        let product_id = filter.product_id.map(|p| p.as_i32());
        let action = filter.action.map(|a| a.as_str());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM stock_log l WHERE {LIST_FILTER}"
        ))
        .bind(product_id)
        .bind(action)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, StockLogRow>(&format!(
            "SELECT {SELECT_JOINED}
             FROM stock_log l
             JOIN product p ON p.id = l.product_id
             LEFT JOIN app_user u ON u.id = l.user_id
             WHERE {LIST_FILTER}
             ORDER BY l.created_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(product_id)
        .bind(action)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((entries, total))
    }

    /// List all entries matching the filter, newest first, for CSV export.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored action is invalid.
    pub async fn list_for_export(
        &self,
        filter: &StockLogFilter,
    ) -> Result<Vec<StockLogEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockLogRow>(&format!(
            "SELECT {SELECT_JOINED}
             FROM stock_log l
             JOIN product p ON p.id = l.product_id
             LEFT JOIN app_user u ON u.id = l.user_id
             WHERE {LIST_FILTER}
             ORDER BY l.created_at DESC"
        ))
        .bind(filter.product_id.map(|p| p.as_i32()))
        .bind(filter.action.map(|a| a.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
