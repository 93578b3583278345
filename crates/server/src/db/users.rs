//! Staff account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tillpoint_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::user::User;

const SELECT_COLUMNS: &str =
    "id, email, password_hash, full_name, role, image_url, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    password_hash: String,
    full_name: String,
    role: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Split into the domain user and the stored password hash.
    fn into_credentials(self) -> Result<(User, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: UserRole = self.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        let user = User {
            id: UserId::new(self.id),
            email,
            full_name: self.full_name,
            role,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        Ok((user, self.password_hash))
    }
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let (user, _) = row.into_credentials()?;
        Ok(user)
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for staff account database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all staff accounts, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM app_user ORDER BY full_name"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a staff account and its password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM app_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_credentials).transpose()
    }

    /// Create a staff account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
        image_url: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO app_user (email, password_hash, full_name, role, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(password_hash)
        .bind(full_name)
        .bind(role.as_str())
        .bind(image_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already exists"))?;

        row.try_into()
    }

    /// Update a staff account. A `None` password hash keeps the stored one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Conflict` if the email is already used by
    /// another user.
    pub async fn update(
        &self,
        id: UserId,
        email: &Email,
        full_name: &str,
        role: UserRole,
        image_url: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE app_user
             SET email = $2, full_name = $3, role = $4, image_url = $5,
                 password_hash = COALESCE($6, password_hash)
             WHERE id = $1
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(email.as_str())
        .bind(full_name)
        .bind(role.as_str())
        .bind(image_url)
        .bind(password_hash)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already exists"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// True if the user has any sales associated with them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_sales(&self, id: UserId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sale WHERE user_id = $1)",
        )
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Delete a staff account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
