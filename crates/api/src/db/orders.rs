//! Order repository: atomic order placement and order history reads.
//!
//! Order placement is the one transactional write path in the system:
//! stock validation, order/detail inserts, and stock decrements all happen
//! inside a single transaction. Either the full order commits or nothing
//! does.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use minimart_core::{OrderDetailId, OrderId, ProductId, StockId, UserId};

use super::RepositoryError;
use crate::models::order::messages;
use crate::models::{LineItem, OrderDetailWithProduct, OrderWithDetails, Product};

/// Outcome of a failed order placement.
///
/// `Rejected` carries every collected condition (missing products,
/// insufficient stock) rather than only the first, so the client can show
/// them all at once.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// The order was rejected by validation; nothing was written.
    #[error("order rejected: {0:?}")]
    Rejected(Vec<String>),

    /// The underlying database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PlaceOrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Product row as read (with stock) at the start of the placement transaction.
#[derive(Debug, sqlx::FromRow)]
struct StockedProductRow {
    id: i32,
    name: String,
    price: i32,
    stock_id: i32,
    quantity: i32,
}

/// Collect rejection messages for an order request against the product rows
/// read at transaction start.
///
/// Missing products produce a single "does not exist" message; each line
/// item whose quantity exceeds the available stock produces one message
/// naming the product. Duplicate entries for the same product are checked
/// independently against the same stock read.
fn collect_rejections(items: &[LineItem], products: &[StockedProductRow]) -> Vec<String> {
    let mut errors = Vec::new();

    let distinct: HashSet<i32> = items.iter().map(|i| i.product_id.as_i32()).collect();
    if products.len() != distinct.len() {
        errors.push(messages::PRODUCT_NOT_FOUND.to_string());
    }

    for item in items {
        if let Some(product) = products
            .iter()
            .find(|p| p.id == item.product_id.as_i32())
            && product.quantity < item.quantity
        {
            errors.push(format!("{} is out of stock", product.name));
        }
    }

    errors
}

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Internal row type for order details joined with their product.
#[derive(Debug, sqlx::FromRow)]
struct OrderDetailRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    price: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_name: String,
    product_price: i32,
    product_image_name: String,
    product_stock_id: i32,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
}

impl From<OrderDetailRow> for OrderDetailWithProduct {
    fn from(row: OrderDetailRow) -> Self {
        Self {
            id: OrderDetailId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
            product: Product {
                id: ProductId::new(row.product_id),
                name: row.product_name,
                price: row.product_price,
                image_name: row.product_image_name,
                stock_id: StockId::new(row.product_stock_id),
                created_at: row.product_created_at,
                updated_at: row.product_updated_at,
            },
        }
    }
}

const DETAIL_SELECT: &str = r"
    SELECT od.id, od.order_id, od.product_id, od.price, od.quantity,
           od.created_at, od.updated_at,
           p.name AS product_name,
           p.price AS product_price,
           p.image_name AS product_image_name,
           p.stock_id AS product_stock_id,
           p.created_at AS product_created_at,
           p.updated_at AS product_updated_at
      FROM order_details od
      JOIN products p ON p.id = od.product_id
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for `user_id` covering all `items`, atomically.
    ///
    /// Reads every referenced product with its stock in one query, collects
    /// existence and stock conditions, and only if none were found inserts
    /// the order, one detail per line item (copying the current product
    /// price), and decrements each stock. Any failure rolls back all
    /// writes.
    ///
    /// Duplicate product ids are processed independently per entry; the
    /// `stocks.quantity >= 0` CHECK constraint fails the transaction if the
    /// combined decrements would oversell.
    ///
    /// # Errors
    ///
    /// Returns `PlaceOrderError::Rejected` with all collected condition
    /// messages when a product is missing or out of stock, or
    /// `PlaceOrderError::Repository` if a query fails.
    pub async fn place(
        &self,
        user_id: UserId,
        items: &[LineItem],
    ) -> Result<OrderId, PlaceOrderError> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<i32> = items.iter().map(|i| i.product_id.as_i32()).collect();
        let products = sqlx::query_as::<_, StockedProductRow>(
            r"
            SELECT p.id, p.name, p.price, p.stock_id, s.quantity
              FROM products p
              JOIN stocks s ON s.id = p.stock_id
             WHERE p.id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        let errors = collect_rejections(items, &products);
        if !errors.is_empty() {
            tx.rollback().await?;
            return Err(PlaceOrderError::Rejected(errors));
        }

        let (order_id,): (i32,) =
            sqlx::query_as("INSERT INTO orders (user_id) VALUES ($1) RETURNING id")
                .bind(user_id.as_i32())
                .fetch_one(&mut *tx)
                .await?;

        for item in items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id.as_i32())
                .ok_or_else(|| {
                    // collect_rejections guarantees every item was found
                    RepositoryError::DataCorruption(format!(
                        "validated product {} missing from read set",
                        item.product_id
                    ))
                })?;

            sqlx::query(
                r"
                INSERT INTO order_details (order_id, product_id, price, quantity)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(product.id)
            .bind(product.price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE stocks SET quantity = quantity - $1 WHERE id = $2")
                .bind(item.quantity)
                .bind(product.stock_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }

    /// Fetch one order scoped to the requesting user.
    ///
    /// An order belonging to another user is treated as not found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderWithDetails>, RepositoryError> {
        let order = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, created_at, updated_at
            FROM orders
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(order_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let query = format!("{DETAIL_SELECT} WHERE od.order_id = $1 ORDER BY od.id");
        let details = sqlx::query_as::<_, OrderDetailRow>(&query)
            .bind(order.id)
            .fetch_all(self.pool)
            .await?;

        Ok(Some(OrderWithDetails {
            id: OrderId::new(order.id),
            user_id: UserId::new(order.user_id),
            created_at: order.created_at,
            updated_at: order.updated_at,
            order_details: details.into_iter().map(Into::into).collect(),
        }))
    }

    /// Fetch all orders for a user, most recent first, with nested details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithDetails>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let query = format!("{DETAIL_SELECT} WHERE od.order_id = ANY($1) ORDER BY od.id");
        let details = sqlx::query_as::<_, OrderDetailRow>(&query)
            .bind(&order_ids)
            .fetch_all(self.pool)
            .await?;

        let mut details_by_order: std::collections::HashMap<i32, Vec<OrderDetailWithProduct>> =
            std::collections::HashMap::new();
        for detail in details {
            details_by_order
                .entry(detail.order_id)
                .or_default()
                .push(detail.into());
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderWithDetails {
                id: OrderId::new(order.id),
                user_id: UserId::new(order.user_id),
                created_at: order.created_at,
                updated_at: order.updated_at,
                order_details: details_by_order.remove(&order.id).unwrap_or_default(),
            })
            .collect())
    }
}
