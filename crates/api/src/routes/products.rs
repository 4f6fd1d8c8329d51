//! Product route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::product::{ProductItem, ProductSearchResult, parse_product_ids};
use crate::state::AppState;

/// Query parameters for product search.
///
/// `page` arrives as a raw string so that non-numeric values can be
/// rejected with the expected message instead of a generic 400.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub filter: Option<String>,
    pub page: Option<String>,
}

/// Query parameters for product lookup by id set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupQuery {
    pub product_ids: Option<String>,
}

/// Search products by name substring, paginated.
///
/// # Errors
///
/// Returns 400 for a missing-from-range or non-numeric `page`.
pub async fn search(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductSearchResult>> {
    let filter = query.filter.unwrap_or_default();
    let page = match query.page {
        None => 1,
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| AppError::BadRequest("Invalid page parameter".to_string()))?,
    };

    let repo = ProductRepository::new(state.pool());
    let result = repo.search(&filter, page, user.id).await?;

    Ok(Json(result))
}

/// Lookup full product details for a comma-separated id set.
///
/// Unparseable tokens are discarded; an empty id set yields `[]` without
/// touching the database. The response is always a bare JSON array.
pub async fn lookup(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Vec<ProductItem>>> {
    let ids = query
        .product_ids
        .as_deref()
        .map(parse_product_ids)
        .unwrap_or_default();

    let repo = ProductRepository::new(state.pool());
    let products = repo.find_by_ids(&ids, user.id).await?;

    Ok(Json(products))
}
