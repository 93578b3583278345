//! Stock audit log route handlers.

use axum::http::header;
use axum::response::IntoResponse;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;

use crate::db::StockLogRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::stock_log::{StockLogEntry, StockLogFilter};
use crate::pagination::{PageQuery, Paginated};
use crate::services::export;
use crate::state::AppState;

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/inventory/logs", get(list))
        .route("/api/inventory/logs/export", get(export_csv))
}

/// List stock log entries, newest first.
///
/// GET /api/inventory/logs
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<StockLogFilter>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<StockLogEntry>>, AppError> {
    let (entries, total) = StockLogRepository::new(state.pool())
        .list(&filter, &page)
        .await?;

    Ok(Json(Paginated::new(entries, &page, total)))
}

/// Export the filtered stock log as CSV.
///
/// GET /api/inventory/logs/export
async fn export_csv(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<StockLogFilter>,
) -> Result<impl IntoResponse, AppError> {
    let entries = StockLogRepository::new(state.pool())
        .list_for_export(&filter)
        .await?;
    let body = export::stock_logs_csv(&entries)?;

    let filename = format!(
        "attachment; filename=\"inventory-logs-{}.csv\"",
        Utc::now().format("%Y-%m-%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    ))
}
