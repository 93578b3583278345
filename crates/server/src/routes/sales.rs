//! Sale listing, checkout, and CSV export route handlers.

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use tillpoint_core::SaleId;

use crate::db::SaleRepository;
use crate::db::sales::SaleQuery;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::sale::{CreateSaleInput, SaleDetail, SaleFilter};
use crate::pagination::{PageQuery, Paginated};
use crate::services::checkout::CheckoutService;
use crate::services::export;
use crate::state::AppState;

/// Build the sales router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sales", get(list).post(create))
        .route("/api/sales/export", get(export_csv))
        .route("/api/sales/{id}", get(detail))
}

/// Parse a `YYYY-MM-DD` or RFC 3339 date bound. Plain dates become the
/// start of day, or the end of day for the upper bound.
fn parse_date_bound(value: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?
    } else {
        NaiveTime::MIN
    };
    Some(date.and_time(time).and_utc())
}

/// Resolve the wire-format filter into repository query bounds.
fn resolve_filter(filter: &SaleFilter) -> Result<SaleQuery<'_>, AppError> {
    let from = filter
        .start_date
        .as_deref()
        .map(|value| {
            parse_date_bound(value, false)
                .ok_or_else(|| AppError::BadRequest(format!("invalid startDate: {value}")))
        })
        .transpose()?;
    let to = filter
        .end_date
        .as_deref()
        .map(|value| {
            parse_date_bound(value, true)
                .ok_or_else(|| AppError::BadRequest(format!("invalid endDate: {value}")))
        })
        .transpose()?;

    Ok(SaleQuery {
        search: filter.search.as_deref(),
        user_id: filter.user_id,
        from,
        to,
        customer_id: None,
    })
}

/// List sales, newest first.
///
/// GET /api/sales
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<SaleFilter>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<SaleDetail>>, AppError> {
    let query = resolve_filter(&filter)?;
    let (sales, total) = SaleRepository::new(state.pool()).list(&query, &page).await?;

    Ok(Json(Paginated::new(sales, &page, total)))
}

/// Checkout: create a sale in one transaction.
///
/// POST /api/sales
async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> Result<(StatusCode, Json<SaleDetail>), AppError> {
    let sale = CheckoutService::new(state.pool())
        .create_sale(user.id, &input)
        .await?;

    tracing::info!(
        sale_id = sale.sale.id.as_i32(),
        total = %sale.sale.total_amount,
        "sale completed"
    );
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Fetch one sale with its line items.
///
/// GET /api/sales/{id}
async fn detail(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SaleDetail>, AppError> {
    let sale = SaleRepository::new(state.pool())
        .get_by_id(SaleId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sale {id} not found")))?;

    Ok(Json(sale))
}

/// Export the filtered sale list as CSV.
///
/// GET /api/sales/export
async fn export_csv(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<SaleFilter>,
) -> Result<impl IntoResponse, AppError> {
    let query = resolve_filter(&filter)?;
    let sales = SaleRepository::new(state.pool())
        .list_for_export(&query)
        .await?;
    let body = export::sales_csv(&sales)?;

    let filename = format!(
        "attachment; filename=\"sales-{}.csv\"",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_date_becomes_start_of_day() {
        let dt = parse_date_bound("2026-08-30", false).expect("parse");
        assert_eq!(dt.to_rfc3339(), "2026-08-30T00:00:00+00:00");
    }

    #[test]
    fn end_bound_covers_the_whole_day() {
        let dt = parse_date_bound("2026-08-30", true).expect("parse");
        assert_eq!(dt.to_rfc3339(), "2026-08-30T23:59:59.999+00:00");
    }

    #[test]
    fn rfc3339_passes_through() {
        let dt = parse_date_bound("2026-08-30T12:30:00+02:00", false).expect("parse");
        assert_eq!(dt.to_rfc3339(), "2026-08-30T10:30:00+00:00");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_date_bound("yesterday", false).is_none());
    }
}
