//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/login             - Log in with email and password
//! POST /api/auth/logout            - Log out
//! GET  /api/auth/me                - Current session user
//!
//! # Products
//! GET    /api/products             - List (search/category/active/lowStock)
//! POST   /api/products             - Create (ADMIN)
//! GET    /api/products/{id}        - Detail
//! PUT    /api/products/{id}        - Update, audited stock change (ADMIN)
//! DELETE /api/products/{id}        - Delete or deactivate (ADMIN)
//!
//! # Categories
//! GET    /api/categories           - List
//! POST   /api/categories           - Create (ADMIN)
//! DELETE /api/categories/{id}      - Delete (ADMIN)
//!
//! # Customers
//! GET    /api/customers            - List/search
//! POST   /api/customers            - Create
//! GET    /api/customers/{id}       - Detail with recent sales
//! PUT    /api/customers/{id}       - Update
//! DELETE /api/customers/{id}       - Delete
//!
//! # Sales
//! GET  /api/sales                  - List (search/userId/startDate/endDate)
//! POST /api/sales                  - Checkout (one transaction)
//! GET  /api/sales/export           - CSV export of the filtered list
//! GET  /api/sales/{id}             - Detail
//!
//! # Users
//! GET    /api/users                - List
//! POST   /api/users                - Create (ADMIN)
//! PUT    /api/users/{id}           - Update (ADMIN)
//! DELETE /api/users/{id}           - Delete (ADMIN)
//!
//! # Settings
//! GET /api/settings                - Fetch (defaults on first read)
//! PUT /api/settings                - Update (ADMIN)
//! GET /api/settings/inventory      - Low-stock threshold
//! PUT /api/settings/inventory      - Update threshold (ADMIN)
//!
//! # Inventory
//! GET /api/inventory/logs          - Stock audit log (productId/action)
//! GET /api/inventory/logs/export   - CSV export
//!
//! # Analytics
//! GET /api/analytics               - Trend, top products, payment breakdown
//! ```

use axum::Router;

use crate::state::AppState;

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod customers;
pub mod inventory;
pub mod products;
pub mod sales;
pub mod settings;
pub mod users;

/// Build the combined application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(customers::router())
        .merge(sales::router())
        .merge(users::router())
        .merge(settings::router())
        .merge(inventory::router())
        .merge(analytics::router())
}
