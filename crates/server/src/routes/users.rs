//! Staff account route handlers.

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use tillpoint_core::UserId;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::user::{CreateUserInput, UpdateUserInput, User};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list).post(create))
        .route("/api/users/{id}", axum::routing::put(update).delete(remove))
}

/// List all staff accounts.
///
/// GET /api/users
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}

/// Create a staff account.
///
/// POST /api/users
async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::new(state.pool()).create_user(&input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a staff account; the password only changes when provided.
///
/// PUT /api/users/{id}
async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<User>, AppError> {
    let user = AuthService::new(state.pool())
        .update_user(UserId::new(id), &input)
        .await?;
    Ok(Json(user))
}

/// Delete a staff account. Self-deletion and accounts with sales history
/// are rejected.
///
/// DELETE /api/users/{id}
async fn remove(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let target = UserId::new(id);
    if target == admin.id {
        return Err(AppError::BadRequest(
            "cannot delete your own account".to_string(),
        ));
    }

    let users = UserRepository::new(state.pool());
    if users.has_sales(target).await? {
        return Err(AppError::Conflict(
            "user has associated sales and cannot be deleted".to_string(),
        ));
    }

    users.delete(target).await?;
    Ok(StatusCode::NO_CONTENT)
}
