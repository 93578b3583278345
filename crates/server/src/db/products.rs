//! Product catalog repository.
//!
//! Stock changes made through `update` are audited: when the quantity
//! differs from the stored value, a `stock_log` row is written in the same
//! transaction as the product update.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use tillpoint_core::{CategoryId, ProductId, UserId};

use super::{RepositoryError, stock_logs};
use crate::models::product::{
    CreateProductInput, Product, ProductFilter, ProductRemoval, UpdateProductInput,
};
use crate::models::stock_log::{NewStockLog, infer_stock_action};
use crate::pagination::PageQuery;

/// Product columns joined with the category name; `p` is the product
/// relation, `c` the category.
const SELECT_JOINED: &str = "p.id, p.name, p.description, p.sku, p.barcode, p.price, p.cost, \
     p.stock_quantity, p.image_url, p.category_id, p.is_active, p.created_at, p.updated_at, \
     c.name AS category_name";

/// Shared WHERE clause for `list` and its count query. Placeholders:
/// `$1` search, `$2` category, `$3` active, `$4` low-stock flag, `$5` threshold.
const LIST_FILTER: &str = "($1::text IS NULL \
        OR p.name ILIKE '%' || $1 || '%' \
        OR p.sku ILIKE '%' || $1 || '%' \
        OR p.barcode ILIKE '%' || $1 || '%') \
     AND ($2::int4 IS NULL OR p.category_id = $2) \
     AND ($3::boolean IS NULL OR p.is_active = $3) \
     AND (NOT $4 OR p.stock_quantity <= $5)";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    sku: String,
    barcode: Option<String>,
    price: Decimal,
    cost: Decimal,
    stock_quantity: i32,
    image_url: Option<String>,
    category_id: Option<i32>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            sku: row.sku,
            barcode: row.barcode,
            price: row.price,
            cost: row.cost,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            category_id: row.category_id.map(CategoryId::new),
            category_name: row.category_name,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching the filter, with the total row count.
    ///
    /// `low_stock_threshold` comes from store settings and is only applied
    /// when the filter's `low_stock` flag is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: &PageQuery,
        low_stock_threshold: i32,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let category_id = filter.category_id.map(|c| c.as_i32());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM product p WHERE {LIST_FILTER}"
        ))
        .bind(filter.search.as_deref())
        .bind(category_id)
        .bind(filter.active)
        .bind(filter.low_stock)
        .bind(low_stock_threshold)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {SELECT_JOINED}
             FROM product p
             LEFT JOIN category c ON c.id = p.category_id
             WHERE {LIST_FILTER}
             ORDER BY p.name
             LIMIT $6 OFFSET $7"
        ))
        .bind(filter.search.as_deref())
        .bind(category_id)
        .bind(filter.active)
        .bind(filter.low_stock)
        .bind(low_stock_threshold)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Get a product with its category name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {SELECT_JOINED}
             FROM product p
             LEFT JOIN category c ON c.id = p.category_id
             WHERE p.id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product. Initial stock is not audited; the product starts
    /// its log history with its first adjustment or sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU already exists.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "WITH inserted AS (
                 INSERT INTO product
                     (name, description, sku, barcode, price, cost,
                      stock_quantity, image_url, category_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 RETURNING *
             )
             SELECT {SELECT_JOINED}
             FROM inserted p
             LEFT JOIN category c ON c.id = p.category_id"
        ))
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(&input.sku)
        .bind(input.barcode.as_deref())
        .bind(input.price)
        .bind(input.cost)
        .bind(input.stock_quantity.max(0))
        .bind(input.image_url.as_deref())
        .bind(input.category_id.map(|c| c.as_i32()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "SKU already exists"))?;

        Ok(row.into())
    }

    /// Update a product. When the stock quantity changes, a stock log row
    /// is written in the same transaction. The new quantity is clamped at 0
    /// and the action is inferred from the free-text reason.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the SKU is already used by
    /// another product.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
        actor: UserId,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, (i32, bool)>(
            "SELECT stock_quantity, is_active FROM product WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let (previous_stock, current_active) = current;
        let new_stock = input.stock_quantity.max(0);
        let is_active = input.is_active.unwrap_or(current_active);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "WITH updated AS (
                 UPDATE product
                 SET name = $2, description = $3, sku = $4, barcode = $5,
                     price = $6, cost = $7, stock_quantity = $8,
                     image_url = $9, category_id = $10, is_active = $11
                 WHERE id = $1
                 RETURNING *
             )
             SELECT {SELECT_JOINED}
             FROM updated p
             LEFT JOIN category c ON c.id = p.category_id"
        ))
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(&input.sku)
        .bind(input.barcode.as_deref())
        .bind(input.price)
        .bind(input.cost)
        .bind(new_stock)
        .bind(input.image_url.as_deref())
        .bind(input.category_id.map(|c| c.as_i32()))
        .bind(is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "SKU already exists"))?;

        if new_stock != previous_stock {
            let log = NewStockLog {
                product_id: id,
                user_id: Some(actor),
                action: infer_stock_action(input.stock_reason.as_deref()),
                quantity_change: new_stock - previous_stock,
                previous_stock,
                new_stock,
                reason: input.stock_reason.as_deref(),
            };
            stock_logs::insert(&mut tx, &log).await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Delete a product, or deactivate it when sales reference it so that
    /// historical sale lines keep their product link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn remove(&self, id: ProductId) -> Result<ProductRemoval, RepositoryError> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sale_item WHERE product_id = $1)",
        )
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await?;

        let (sql, removal) = if referenced {
            (
                "UPDATE product SET is_active = FALSE WHERE id = $1",
                ProductRemoval::Deactivated,
            )
        } else {
            ("DELETE FROM product WHERE id = $1", ProductRemoval::Deleted)
        };

        let result = sqlx::query(sql).bind(id.as_i32()).execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(removal)
    }
}
