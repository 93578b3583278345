//! Category route handlers.

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use tillpoint_core::CategoryId;

use crate::db::CategoryRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::category::{Category, CategoryInput};
use crate::state::AppState;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/{id}", delete(remove))
}

/// List all categories.
///
/// GET /api/categories
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = CategoryRepository::new(state.pool()).list_all().await?;
    Ok(Json(categories))
}

/// Create a category.
///
/// POST /api/categories
async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(
            "category name must not be empty".to_string(),
        ));
    }

    let category = CategoryRepository::new(state.pool()).create(name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a category; its products keep a NULL category.
///
/// DELETE /api/categories/{id}
async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
