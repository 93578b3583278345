//! Analytics route handlers.

use axum::{Json, Router, extract::State, routing::get};

use crate::db::AnalyticsRepository;
use crate::db::analytics::AnalyticsOverview;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Build the analytics router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/analytics", get(overview))
}

/// Seven-day sales trend, top products, and payment breakdown.
///
/// GET /api/analytics
async fn overview(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsOverview>, AppError> {
    let overview = AnalyticsRepository::new(state.pool()).overview().await?;
    Ok(Json(overview))
}
