//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with
//! SameSite=Strict and a 24 hour inactivity expiry.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tillpoint_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The session table is created by the migrations, not by the store.
///
/// # Panics
///
/// Panics if the schema or table name is invalid (should never happen with
/// the hardcoded "public" and "session" values).
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &ServerConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("public")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");

    // Cookies are only marked Secure when serving HTTPS
    let is_secure = config.tls.is_some();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
