//! Customer repository.
//!
//! Loyalty point balances are only changed by checkout (redeem and earn)
//! inside the sale transaction, never through customer updates.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tillpoint_core::CustomerId;

use super::RepositoryError;
use crate::models::customer::{Customer, CustomerFilter, CustomerInput};
use crate::pagination::PageQuery;

const SELECT_COLUMNS: &str =
    "id, full_name, email, phone, loyalty_points, created_at, updated_at";

const LIST_FILTER: &str = "($1::text IS NULL \
        OR full_name ILIKE '%' || $1 || '%' \
        OR email ILIKE '%' || $1 || '%' \
        OR phone ILIKE '%' || $1 || '%')";

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
    loyalty_points: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId::new(row.id),
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            loyalty_points: row.loyalty_points,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List customers matching the search filter, with the total row count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &CustomerFilter,
        page: &PageQuery,
    ) -> Result<(Vec<Customer>, i64), RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM customer WHERE {LIST_FILTER}"
        ))
        .bind(filter.search.as_deref())
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer
             WHERE {LIST_FILTER}
             ORDER BY full_name
             LIMIT $2 OFFSET $3"
        ))
        .bind(filter.search.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a customer with a zero loyalty balance.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CustomerInput) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customer (full_name, email, phone)
             VALUES ($1, $2, $3)
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&input.full_name)
        .bind(input.email.as_deref())
        .bind(input.phone.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a customer's contact details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    pub async fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customer
             SET full_name = $2, email = $3, phone = $4
             WHERE id = $1
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&input.full_name)
        .bind(input.email.as_deref())
        .bind(input.phone.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a customer. Their sales keep a NULL customer (FK is SET NULL).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
