//! Read-only aggregate queries for the analytics endpoint.
//!
//! Only COMPLETED sales count towards any of these figures.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use tillpoint_core::{PaymentMethod, ProductId, SaleStatus};

use super::RepositoryError;

const TREND_DAYS: i64 = 7;
const TOP_PRODUCT_LIMIT: i64 = 5;

/// Everything `GET /api/analytics` returns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub sales_trend: Vec<TrendPoint>,
    pub top_products: Vec<TopProduct>,
    pub payment_breakdown: Vec<PaymentBreakdown>,
}

/// One day of the sales trend. Days without sales appear with zeros.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Display label, e.g. "Aug 30".
    pub date: String,
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub count: i64,
    pub total: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct TrendRow {
    day: DateTime<Utc>,
    total: Decimal,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct TopProductRow {
    product_id: i32,
    name: String,
    quantity_sold: i64,
    revenue: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    payment_method: String,
    count: i64,
    total: Decimal,
}

/// Repository for analytics aggregates.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Build the full analytics overview.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored payment method
    /// is invalid.
    pub async fn overview(&self) -> Result<AnalyticsOverview, RepositoryError> {
        Ok(AnalyticsOverview {
            sales_trend: self.sales_trend().await?,
            top_products: self.top_products().await?,
            payment_breakdown: self.payment_breakdown().await?,
        })
    }

    /// Daily revenue and sale counts for the last seven days, zero-filled.
    async fn sales_trend(&self) -> Result<Vec<TrendPoint>, RepositoryError> {
        let today = Utc::now().date_naive();
        let window_start = (today - Duration::days(TREND_DAYS - 1))
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc());

        let rows = sqlx::query_as::<_, TrendRow>(
            "SELECT date_trunc('day', created_at) AS day,
                    COALESCE(SUM(total_amount), 0) AS total,
                    COUNT(*) AS count
             FROM sale
             WHERE status = $1 AND ($2::timestamptz IS NULL OR created_at >= $2)
             GROUP BY day",
        )
        .bind(SaleStatus::Completed.as_str())
        .bind(window_start)
        .fetch_all(self.pool)
        .await?;

        let by_day: std::collections::HashMap<_, _> = rows
            .into_iter()
            .map(|row| (row.day.date_naive(), (row.total, row.count)))
            .collect();

        let trend = (0..TREND_DAYS)
            .map(|offset| {
                let date = today - Duration::days(TREND_DAYS - 1 - offset);
                let (total, count) = by_day.get(&date).copied().unwrap_or((Decimal::ZERO, 0));
                TrendPoint {
                    date: date.format("%b %d").to_string(),
                    total,
                    count,
                }
            })
            .collect();

        Ok(trend)
    }

    /// The five best-selling products by quantity, all time.
    async fn top_products(&self) -> Result<Vec<TopProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopProductRow>(
            "SELECT si.product_id, p.name,
                    SUM(si.quantity)::int8 AS quantity_sold,
                    COALESCE(SUM(si.subtotal), 0) AS revenue
             FROM sale_item si
             JOIN sale s ON s.id = si.sale_id
             JOIN product p ON p.id = si.product_id
             WHERE s.status = $1
             GROUP BY si.product_id, p.name
             ORDER BY quantity_sold DESC
             LIMIT $2",
        )
        .bind(SaleStatus::Completed.as_str())
        .bind(TOP_PRODUCT_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopProduct {
                product_id: ProductId::new(row.product_id),
                name: row.name,
                quantity_sold: row.quantity_sold,
                revenue: row.revenue,
            })
            .collect())
    }

    /// Sale counts and totals per payment method.
    async fn payment_breakdown(&self) -> Result<Vec<PaymentBreakdown>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT payment_method,
                    COUNT(*) AS count,
                    COALESCE(SUM(total_amount), 0) AS total
             FROM sale
             WHERE status = $1
             GROUP BY payment_method
             ORDER BY payment_method",
        )
        .bind(SaleStatus::Completed.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let method: PaymentMethod = row.payment_method.parse().map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "invalid payment method in database: {e}"
                    ))
                })?;
                Ok(PaymentBreakdown {
                    method,
                    count: row.count,
                    total: row.total,
                })
            })
            .collect()
    }
}
