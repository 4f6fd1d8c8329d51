//! Product repository: search with pagination and lookup by id set.
//!
//! Both operations annotate each product with its current stock quantity
//! and the creation time of the requesting user's most recent order
//! containing the product, absent if never ordered.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use minimart_core::{ProductId, StockId, UserId};

use super::RepositoryError;
use crate::models::{ProductItem, ProductSearchResult};

/// Fixed page size for product search.
pub const PAGE_SIZE: i64 = 10;

/// Internal row type for annotated product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductItemRow {
    id: i32,
    name: String,
    price: i32,
    image_name: String,
    stock_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    quantity: i32,
    last_ordered_at: Option<DateTime<Utc>>,
}

impl From<ProductItemRow> for ProductItem {
    fn from(row: ProductItemRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            image_name: row.image_name,
            stock_id: StockId::new(row.stock_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            quantity: row.quantity,
            last_ordered_at: row.last_ordered_at,
        }
    }
}

/// Shared SELECT list for annotated product queries.
///
/// The correlated subquery yields NULL for products the user has never
/// ordered, which serializes as an absent `lastOrderedAt`.
const ANNOTATED_SELECT: &str = r"
    SELECT p.id, p.name, p.price, p.image_name, p.stock_id,
           p.created_at, p.updated_at,
           s.quantity,
           (SELECT max(o.created_at)
              FROM orders o
              JOIN order_details od ON od.order_id = o.id
             WHERE od.product_id = p.id
               AND o.user_id = $1) AS last_ordered_at
      FROM products p
      JOIN stocks s ON s.id = p.stock_id
";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Search products by name substring, returning one page plus the total
    /// match count.
    ///
    /// `page` is 1-based; callers validate `page >= 1` before reaching here.
    /// An empty filter matches every product. Results are ordered by product
    /// id so pagination is stable across identical reads.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn search(
        &self,
        filter: &str,
        page: u32,
        user_id: UserId,
    ) -> Result<ProductSearchResult, RepositoryError> {
        let offset = i64::from(page.saturating_sub(1)) * PAGE_SIZE;

        let query = format!(
            "{ANNOTATED_SELECT}
             WHERE p.name LIKE '%' || $2 || '%'
             ORDER BY p.id
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, ProductItemRow>(&query)
            .bind(user_id.as_i32())
            .bind(filter)
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let hit_count: i64 =
            sqlx::query_scalar("SELECT count(*) FROM products WHERE name LIKE '%' || $1 || '%'")
                .bind(filter)
                .fetch_one(self.pool)
                .await?;

        Ok(ProductSearchResult {
            products: rows.into_iter().map(ProductItem::from).collect(),
            hit_count,
        })
    }

    /// Fetch annotated product details for a set of ids.
    ///
    /// An empty id set returns an empty vec without querying. Matching rows
    /// come back in no guaranteed order; ids without a matching product are
    /// silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_ids(
        &self,
        ids: &[ProductId],
        user_id: UserId,
    ) -> Result<Vec<ProductItem>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

        let query = format!("{ANNOTATED_SELECT} WHERE p.id = ANY($2)");
        let rows = sqlx::query_as::<_, ProductItemRow>(&query)
            .bind(user_id.as_i32())
            .bind(&raw_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductItem::from).collect())
    }
}
