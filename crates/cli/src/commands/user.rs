//! Staff account management commands.
//!
//! # Usage
//!
//! ```bash
//! tillpoint-cli user create -e admin@example.com -n "Store Admin" -p "secret-password" -r admin
//! ```
//!
//! # Environment Variables
//!
//! - `TILLPOINT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use tillpoint_core::{Email, UserRole};

/// Minimum password length, matching the server's requirement.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during staff account operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, staff")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// User already exists.
    #[error("Staff account already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    Hash,
}

/// Create a new staff account and return its ID.
///
/// # Errors
///
/// Returns `UserError` when validation fails, the email is taken, or the
/// database is unreachable.
pub async fn create(email: &str, name: &str, password: &str, role: &str) -> Result<i32, UserError> {
    dotenvy::dotenv().ok();

    let role: UserRole = role
        .to_uppercase()
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;

    let email = Email::parse(email).map_err(|e| UserError::InvalidEmail(e.to_string()))?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserError::WeakPassword);
    }

    let database_url = std::env::var("TILLPOINT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| UserError::MissingEnvVar("TILLPOINT_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM app_user WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(UserError::UserExists(email.to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| UserError::Hash)?
        .to_string();

    tracing::info!("Creating staff account: {} ({})", email, role);
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO app_user (email, password_hash, full_name, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(email.as_str())
    .bind(&hash)
    .bind(name)
    .bind(role.as_str())
    .fetch_one(&pool)
    .await?;

    Ok(id)
}
