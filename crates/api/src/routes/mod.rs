//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /api/auth/register      - Create an account
//! POST /api/auth/login         - Login, sets session cookie
//! POST /api/auth/logout        - Logout, clears session
//! GET  /api/auth/me            - Current user
//!
//! # Products (require auth)
//! GET  /api/products/search    - Paginated name search: {products, hitCount}
//! GET  /api/products           - Lookup by ?productIds=1,2,3: bare array
//!
//! # Orders (require auth)
//! POST /api/orders             - Place an order: {orderId}
//! GET  /api/orders             - Current user's orders, newest first
//! GET  /api/orders/{id}        - One order, 404 if absent or not owned
//! ```

pub mod auth;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::lookup))
        .route("/search", get(products::search))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes())
}
