//! Store settings route handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::settings::{
    StoreSettings, UpdateInventorySettingsInput, UpdateSettingsInput,
};
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(fetch).put(update))
        .route(
            "/api/settings/inventory",
            get(fetch_inventory).put(update_inventory),
        )
}

/// Fetch store settings, creating the defaults on first read.
///
/// GET /api/settings
async fn fetch(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<StoreSettings>, AppError> {
    let settings = SettingsRepository::new(state.pool()).get_or_init().await?;
    Ok(Json(settings))
}

/// Update store settings.
///
/// PUT /api/settings
async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateSettingsInput>,
) -> Result<Json<StoreSettings>, AppError> {
    if input.store_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "store name must not be empty".to_string(),
        ));
    }
    if input.tax_rate < Decimal::ZERO || input.loyalty_rate < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "rates must not be negative".to_string(),
        ));
    }

    let settings = SettingsRepository::new(state.pool()).update(&input).await?;
    Ok(Json(settings))
}

/// Fetch only the low-stock threshold.
///
/// GET /api/settings/inventory
async fn fetch_inventory(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let settings = SettingsRepository::new(state.pool()).get_or_init().await?;
    Ok(Json(
        json!({ "lowStockThreshold": settings.low_stock_threshold }),
    ))
}

/// Update the low-stock threshold.
///
/// PUT /api/settings/inventory
async fn update_inventory(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateInventorySettingsInput>,
) -> Result<Json<Value>, AppError> {
    if input.low_stock_threshold < 1 {
        return Err(AppError::BadRequest(
            "low stock threshold must be at least 1".to_string(),
        ));
    }

    let settings = SettingsRepository::new(state.pool())
        .update_low_stock_threshold(input.low_stock_threshold)
        .await?;
    Ok(Json(
        json!({ "lowStockThreshold": settings.low_stock_threshold }),
    ))
}
