//! Authentication route handlers.

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// Verify credentials and establish a session.
///
/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentUser>, AppError> {
    let user = AuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await?;

    // New session ID on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(current.id.as_i32(), Some(current.email.as_str()));
    tracing::info!(user_id = current.id.as_i32(), "staff login");

    Ok(Json(current))
}

/// Destroy the session.
///
/// POST /api/auth/logout
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// Return the logged-in staff member.
///
/// GET /api/auth/me
async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}
