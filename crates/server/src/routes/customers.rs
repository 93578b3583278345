//! Customer route handlers.

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Serialize;

use tillpoint_core::CustomerId;

use crate::db::sales::SaleQuery;
use crate::db::{CustomerRepository, SaleRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::customer::{Customer, CustomerFilter, CustomerInput};
use crate::models::sale::SaleDetail;
use crate::pagination::{PageQuery, Paginated};
use crate::state::AppState;

/// How many recent sales the customer detail view includes.
const RECENT_SALES_LIMIT: i64 = 5;

/// Customer detail with their most recent sales.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub recent_sales: Vec<SaleDetail>,
}

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list).post(create))
        .route(
            "/api/customers/{id}",
            get(detail).put(update).delete(remove),
        )
}

/// List or search customers.
///
/// GET /api/customers
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Customer>>, AppError> {
    let (customers, total) = CustomerRepository::new(state.pool())
        .list(&filter, &page)
        .await?;

    Ok(Json(Paginated::new(customers, &page, total)))
}

/// Create a customer.
///
/// POST /api/customers
async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    if input.full_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "customer name must not be empty".to_string(),
        ));
    }

    let customer = CustomerRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Fetch a customer with their recent sales.
///
/// GET /api/customers/{id}
async fn detail(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CustomerDetail>, AppError> {
    let customer_id = CustomerId::new(id);
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id} not found")))?;

    let query = SaleQuery {
        customer_id: Some(customer_id),
        ..SaleQuery::default()
    };
    let page = PageQuery {
        page: Some(1),
        limit: Some(RECENT_SALES_LIMIT),
    };
    let (recent_sales, _total) = SaleRepository::new(state.pool()).list(&query, &page).await?;

    Ok(Json(CustomerDetail {
        customer,
        recent_sales,
    }))
}

/// Update a customer's contact details.
///
/// PUT /api/customers/{id}
async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, AppError> {
    if input.full_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "customer name must not be empty".to_string(),
        ));
    }

    let customer = CustomerRepository::new(state.pool())
        .update(CustomerId::new(id), &input)
        .await?;
    Ok(Json(customer))
}

/// Delete a customer; their sales keep a NULL customer link.
///
/// DELETE /api/customers/{id}
async fn remove(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    CustomerRepository::new(state.pool())
        .delete(CustomerId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
