//! Sale repository.
//!
//! Reads join cashier, customer and product display names. Writes happen
//! inside the checkout transaction, so the insert helpers take the open
//! transaction rather than the pool.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use tillpoint_core::{
    CustomerId, PaymentMethod, ProductId, SaleId, SaleItemId, SaleStatus, UserId,
};

use super::RepositoryError;
use crate::models::sale::{Sale, SaleDetail, SaleItem};
use crate::pagination::PageQuery;

const SELECT_JOINED: &str = "s.id, s.user_id, s.customer_id, s.total_amount, s.tax_amount, \
     s.discount_amount, s.points_redeemed, s.points_earned, s.payment_method, s.status, \
     s.created_at, u.full_name AS cashier_name, c.full_name AS customer_name";

const JOINS: &str = "FROM sale s \
     JOIN app_user u ON u.id = s.user_id \
     LEFT JOIN customer c ON c.id = s.customer_id";

/// Shared WHERE clause for listings. Placeholders: `$1` search (sale id or
/// customer name), `$2` cashier, `$3` from, `$4` to, `$5` customer.
const LIST_FILTER: &str = "($1::text IS NULL \
        OR s.id::text = $1 \
        OR c.full_name ILIKE '%' || $1 || '%') \
     AND ($2::int4 IS NULL OR s.user_id = $2) \
     AND ($3::timestamptz IS NULL OR s.created_at >= $3) \
     AND ($4::timestamptz IS NULL OR s.created_at <= $4) \
     AND ($5::int4 IS NULL OR s.customer_id = $5)";

/// Resolved listing filters (dates already parsed by the route layer).
#[derive(Debug, Default)]
pub struct SaleQuery<'a> {
    pub search: Option<&'a str>,
    pub user_id: Option<UserId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub customer_id: Option<CustomerId>,
}

/// Computed sale header values, ready for insertion.
#[derive(Debug)]
pub struct NewSale {
    pub user_id: UserId,
    pub customer_id: Option<CustomerId>,
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub points_redeemed: i32,
    pub points_earned: i32,
    pub payment_method: PaymentMethod,
}

/// Computed line item values, ready for insertion.
#[derive(Debug)]
pub struct NewSaleItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_amount: Decimal,
    pub subtotal: Decimal,
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i32,
    user_id: i32,
    customer_id: Option<i32>,
    total_amount: Decimal,
    tax_amount: Decimal,
    discount_amount: Decimal,
    points_redeemed: i32,
    points_earned: i32,
    payment_method: String,
    status: String,
    created_at: DateTime<Utc>,
    cashier_name: String,
    customer_name: Option<String>,
}

impl SaleRow {
    fn into_detail(self, items: Vec<SaleItem>) -> Result<SaleDetail, RepositoryError> {
        let payment_method: PaymentMethod = self.payment_method.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;
        let status: SaleStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sale status in database: {e}"))
        })?;

        Ok(SaleDetail {
            sale: Sale {
                id: SaleId::new(self.id),
                user_id: UserId::new(self.user_id),
                customer_id: self.customer_id.map(CustomerId::new),
                total_amount: self.total_amount,
                tax_amount: self.tax_amount,
                discount_amount: self.discount_amount,
                points_redeemed: self.points_redeemed,
                points_earned: self.points_earned,
                payment_method,
                status,
                created_at: self.created_at,
            },
            cashier_name: self.cashier_name,
            customer_name: self.customer_name,
            items,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: i32,
    sale_id: i32,
    product_id: i32,
    product_name: String,
    sku: String,
    quantity: i32,
    unit_price: Decimal,
    discount_amount: Decimal,
    subtotal: Decimal,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        Self {
            id: SaleItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            sku: row.sku,
            quantity: row.quantity,
            unit_price: row.unit_price,
            discount_amount: row.discount_amount,
            subtotal: row.subtotal,
        }
    }
}

// =============================================================================
// Transaction Helpers (used by checkout)
// =============================================================================

/// Insert the sale header row and return its ID.
pub(crate) async fn insert_sale(
    tx: &mut Transaction<'_, Postgres>,
    sale: &NewSale,
) -> Result<SaleId, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO sale
             (user_id, customer_id, total_amount, tax_amount, discount_amount,
              points_redeemed, points_earned, payment_method, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id",
    )
    .bind(sale.user_id.as_i32())
    .bind(sale.customer_id.map(|c| c.as_i32()))
    .bind(sale.total_amount)
    .bind(sale.tax_amount)
    .bind(sale.discount_amount)
    .bind(sale.points_redeemed)
    .bind(sale.points_earned)
    .bind(sale.payment_method.as_str())
    .bind(SaleStatus::Completed.as_str())
    .fetch_one(&mut **tx)
    .await?;

    Ok(SaleId::new(id))
}

/// Insert one line item for a sale.
pub(crate) async fn insert_item(
    tx: &mut Transaction<'_, Postgres>,
    sale_id: SaleId,
    item: &NewSaleItem,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO sale_item
             (sale_id, product_id, quantity, unit_price, discount_amount, subtotal)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(sale_id.as_i32())
    .bind(item.product_id.as_i32())
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.discount_amount)
    .bind(item.subtotal)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for reading sales.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List sales matching the query, newest first, with the total row count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(
        &self,
        query: &SaleQuery<'_>,
        page: &PageQuery,
    ) -> Result<(Vec<SaleDetail>, i64), RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) {JOINS} WHERE {LIST_FILTER}"
        ))
        .bind(query.search)
        .bind(query.user_id.map(|u| u.as_i32()))
        .bind(query.from)
        .bind(query.to)
        .bind(query.customer_id.map(|c| c.as_i32()))
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SELECT_JOINED} {JOINS}
             WHERE {LIST_FILTER}
             ORDER BY s.created_at DESC
             LIMIT $6 OFFSET $7"
        ))
        .bind(query.search)
        .bind(query.user_id.map(|u| u.as_i32()))
        .bind(query.from)
        .bind(query.to)
        .bind(query.customer_id.map(|c| c.as_i32()))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let details = self.attach_items(rows).await?;
        Ok((details, total))
    }

    /// List all sales matching the query, newest first, for CSV export.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_export(
        &self,
        query: &SaleQuery<'_>,
    ) -> Result<Vec<SaleDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SELECT_JOINED} {JOINS}
             WHERE {LIST_FILTER}
             ORDER BY s.created_at DESC"
        ))
        .bind(query.search)
        .bind(query.user_id.map(|u| u.as_i32()))
        .bind(query.from)
        .bind(query.to)
        .bind(query.customer_id.map(|c| c.as_i32()))
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Get a sale with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: SaleId) -> Result<Option<SaleDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SELECT_JOINED} {JOINS} WHERE s.id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut details = self.attach_items(vec![row]).await?;
        Ok(details.pop())
    }

    /// Fetch line items for a batch of sales and zip them back together.
    async fn attach_items(
        &self,
        sales: Vec<SaleRow>,
    ) -> Result<Vec<SaleDetail>, RepositoryError> {
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = sales.iter().map(|s| s.id).collect();
        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            "SELECT si.id, si.sale_id, si.product_id, p.name AS product_name, p.sku,
                    si.quantity, si.unit_price, si.discount_amount, si.subtotal
             FROM sale_item si
             JOIN product p ON p.id = si.product_id
             WHERE si.sale_id = ANY($1)
             ORDER BY si.id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_sale: HashMap<i32, Vec<SaleItem>> = HashMap::new();
        for row in item_rows {
            by_sale.entry(row.sale_id).or_default().push(row.into());
        }

        sales
            .into_iter()
            .map(|row| {
                let items = by_sale.remove(&row.id).unwrap_or_default();
                row.into_detail(items)
            })
            .collect()
    }
}
