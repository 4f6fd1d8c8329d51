//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::Value;

use minimart_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::OrderWithDetails;
use crate::models::order::parse_order_request;
use crate::state::AppState;

/// Response body for a successfully placed order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
}

/// Place an order for the current user.
///
/// The body is taken as raw JSON so malformed shapes produce the
/// documented validation messages rather than a deserializer error.
///
/// # Errors
///
/// Returns 422 with all collected messages when the body is malformed, a
/// product is missing, or stock is insufficient; nothing is written in any
/// of those cases.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CreateOrderResponse>> {
    let items = parse_order_request(&body).map_err(AppError::Validation)?;

    let repo = OrderRepository::new(state.pool());
    let order_id = repo.place(user.id, &items).await?;

    tracing::info!(user_id = %user.id, order_id = %order_id, items = items.len(), "order placed");
    Ok(Json(CreateOrderResponse { order_id }))
}

/// Fetch one order belonging to the current user.
///
/// # Errors
///
/// Returns 400 for a non-numeric id, 404 if the order does not exist or
/// belongs to another user.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderWithDetails>> {
    let order_id = id
        .parse::<i32>()
        .map(OrderId::new)
        .map_err(|_| AppError::BadRequest("Invalid order ID".to_string()))?;

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .find_for_user(order_id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(order))
}

/// List all orders for the current user, newest first.
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithDetails>>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_for_user(user.id).await?;

    Ok(Json(orders))
}
