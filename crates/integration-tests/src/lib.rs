//! Integration tests for Minimart.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and run migrations
//! cargo run -p minimart-cli -- migrate
//!
//! # Start the API server
//! cargo run -p minimart-api
//!
//! # Run integration tests (they are #[ignore]d by default)
//! cargo test -p minimart-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `MINIMART_BASE_URL` - API base URL (default: `http://localhost:3000`)
//! - `MINIMART_DATABASE_URL` / `DATABASE_URL` - database the server uses

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique suffix for test data (email addresses, product names).
#[must_use]
pub fn unique_tag() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{nanos}-{n}")
}

/// Shared context for integration tests: an HTTP client with a cookie
/// store, the API base URL, and a direct database connection for seeding
/// and verification.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the server and database.
    ///
    /// # Panics
    ///
    /// Panics if the database is unreachable or environment is missing.
    pub async fn new() -> Self {
        let base_url = std::env::var("MINIMART_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let database_url = std::env::var("MINIMART_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .expect("MINIMART_DATABASE_URL not set");

        let pool = minimart_api::db::create_pool(&database_url)
            .await
            .expect("Failed to connect to database");

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            pool,
        }
    }

    /// Register a fresh user and leave the session cookie in the client.
    ///
    /// Returns the new user's id.
    ///
    /// # Panics
    ///
    /// Panics if registration fails.
    pub async fn register_and_login(&self) -> i64 {
        let tag = unique_tag();
        let resp = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&json!({
                "email": format!("test-{tag}@example.com"),
                "name": format!("Test User {tag}"),
                "password": "integration-test-password",
            }))
            .send()
            .await
            .expect("register request failed");

        assert!(
            resp.status().is_success(),
            "registration failed: {}",
            resp.status()
        );

        let body: Value = resp.json().await.expect("invalid register response");
        body["id"].as_i64().expect("register response missing id")
    }

    /// Insert a product with a stock row directly into the database.
    ///
    /// Returns the new product's id.
    ///
    /// # Panics
    ///
    /// Panics if the inserts fail.
    pub async fn create_product(&self, name: &str, price: i32, stock: i32) -> i32 {
        let (stock_id,): (i32,) =
            sqlx::query_as("INSERT INTO stocks (quantity) VALUES ($1) RETURNING id")
                .bind(stock)
                .fetch_one(&self.pool)
                .await
                .expect("failed to insert stock");

        let (product_id,): (i32,) = sqlx::query_as(
            "INSERT INTO products (name, price, image_name, stock_id)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(price)
        .bind(format!("{name}.png"))
        .bind(stock_id)
        .fetch_one(&self.pool)
        .await
        .expect("failed to insert product");

        product_id
    }

    /// Change a product's catalog price.
    ///
    /// # Panics
    ///
    /// Panics if the update fails.
    pub async fn set_product_price(&self, product_id: i32, price: i32) {
        sqlx::query("UPDATE products SET price = $1, updated_at = now() WHERE id = $2")
            .bind(price)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .expect("failed to update product price");
    }

    /// Read a product's current stock quantity.
    ///
    /// # Panics
    ///
    /// Panics if the product does not exist.
    pub async fn stock_quantity(&self, product_id: i32) -> i32 {
        let (quantity,): (i32,) = sqlx::query_as(
            "SELECT s.quantity FROM stocks s JOIN products p ON p.stock_id = s.id WHERE p.id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .expect("failed to read stock");
        quantity
    }

    /// Count order rows for a user.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn order_count(&self, user_id: i64) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM orders WHERE user_id = $1")
            .bind(i32::try_from(user_id).expect("user id out of range"))
            .fetch_one(&self.pool)
            .await
            .expect("failed to count orders")
    }
}
