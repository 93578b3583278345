//! Product catalog route handlers.

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use tillpoint_core::ProductId;

use crate::db::{ProductRepository, SettingsRepository};
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::product::{
    CreateProductInput, Product, ProductFilter, ProductRemoval, UpdateProductInput,
};
use crate::pagination::{PageQuery, Paginated};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route(
            "/api/products/{id}",
            get(detail).put(update).delete(remove),
        )
}

fn validate_amounts(price: Decimal, cost: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO || cost < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "price and cost must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// List products with search/category/active/low-stock filters.
///
/// GET /api/products
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Product>>, AppError> {
    let settings = SettingsRepository::new(state.pool()).get_or_init().await?;
    let (products, total) = ProductRepository::new(state.pool())
        .list(&filter, &page, settings.low_stock_threshold)
        .await?;

    Ok(Json(Paginated::new(products, &page, total)))
}

/// Create a product.
///
/// POST /api/products
async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    validate_amounts(input.price, input.cost)?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Fetch one product with its category.
///
/// GET /api/products/{id}
async fn detail(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    Ok(Json(product))
}

/// Update a product; stock changes are clamped at zero and audited.
///
/// PUT /api/products/{id}
async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, AppError> {
    validate_amounts(input.price, input.cost)?;

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &input, admin.id)
        .await?;
    Ok(Json(product))
}

/// Delete a product, deactivating it instead when sales reference it.
///
/// DELETE /api/products/{id}
async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let removal = ProductRepository::new(state.pool())
        .remove(ProductId::new(id))
        .await?;

    let deactivated = matches!(removal, ProductRemoval::Deactivated);
    Ok(Json(json!({ "deactivated": deactivated })))
}
