//! Product domain types and the `productIds` query-string parser.

use chrono::{DateTime, Utc};
use serde::Serialize;

use minimart_core::{ProductId, StockId};

/// A product as embedded in order detail responses.
///
/// Carries the product's *current* attributes; the price frozen at purchase
/// time lives on the order detail row, not here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Current price in the smallest currency unit.
    pub price: i32,
    pub image_name: String,
    pub stock_id: StockId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product annotated with stock and order history, as returned by search
/// and lookup endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
    pub id: ProductId,
    pub name: String,
    pub price: i32,
    pub image_name: String,
    pub stock_id: StockId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Current stock quantity.
    pub quantity: i32,
    /// When the requesting user last ordered this product, if ever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ordered_at: Option<DateTime<Utc>>,
}

/// One page of search results plus the total match count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResult {
    pub products: Vec<ProductItem>,
    /// Total number of products matching the filter, independent of paging.
    pub hit_count: i64,
}

/// Parse a comma-separated `productIds` query value into product IDs.
///
/// Unparseable tokens are silently discarded; duplicates are kept as-is.
/// An empty or missing value yields an empty vec.
#[must_use]
pub fn parse_product_ids(raw: &str) -> Vec<ProductId> {
    raw.split(',')
        .filter_map(|token| token.trim().parse::<i32>().ok())
        .map(ProductId::new)
        .collect()
}
