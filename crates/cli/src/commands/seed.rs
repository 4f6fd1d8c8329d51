//! Database seeding command.
//!
//! Inserts a small demo dataset: two users, a product catalog with stock
//! rows, and a couple of historical orders so `lastOrderedAt` annotations
//! have something to show.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error")]
    PasswordHash,
}

/// Demo password shared by all seeded users.
const SEED_PASSWORD: &str = "password123";

const SEED_USERS: &[(&str, &str)] = &[
    ("alice@example.com", "Alice"),
    ("bob@example.com", "Bob"),
];

/// (name, price, image file, initial stock)
const SEED_PRODUCTS: &[(&str, i32, &str, i32)] = &[
    ("Apple", 100, "apple.png", 10),
    ("Banana", 50, "banana.png", 20),
    ("Cherry", 300, "cherry.png", 5),
    ("Grape", 250, "grape.png", 8),
    ("Lemon", 120, "lemon.png", 15),
    ("Melon", 800, "melon.png", 3),
    ("Orange", 90, "orange.png", 25),
    ("Peach", 400, "peach.png", 6),
    ("Pear", 180, "pear.png", 12),
    ("Plum", 220, "plum.png", 9),
    ("Strawberry", 600, "strawberry.png", 4),
];

/// Seed the database with demo data.
///
/// Idempotent for users (skips existing emails); products and orders are
/// only inserted when the catalog is empty.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a query fails.
pub async fn run() -> Result<(), SeedError> {
    let database_url = super::database_url().map_err(SeedError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = minimart_api::db::create_pool(&database_url).await?;

    let user_ids = seed_users(&pool).await?;
    let product_count: i64 = sqlx::query_scalar("SELECT count(*) FROM products")
        .fetch_one(&pool)
        .await?;

    if product_count > 0 {
        tracing::info!("Catalog already seeded, skipping products and orders");
        return Ok(());
    }

    let product_ids = seed_products(&pool).await?;
    seed_orders(&pool, &user_ids, &product_ids).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<Vec<i32>, SeedError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(SEED_PASSWORD.as_bytes(), &salt)
        .map_err(|_| SeedError::PasswordHash)?
        .to_string();

    let mut ids = Vec::with_capacity(SEED_USERS.len());
    for (email, name) in SEED_USERS {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            ",
        )
        .bind(email)
        .bind(name)
        .bind(&password_hash)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    tracing::info!(count = ids.len(), "Seeded users");
    Ok(ids)
}

async fn seed_products(pool: &PgPool) -> Result<Vec<i32>, SeedError> {
    let mut ids = Vec::with_capacity(SEED_PRODUCTS.len());
    for (name, price, image_name, stock) in SEED_PRODUCTS {
        let (stock_id,): (i32,) =
            sqlx::query_as("INSERT INTO stocks (quantity) VALUES ($1) RETURNING id")
                .bind(stock)
                .fetch_one(pool)
                .await?;

        let (product_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO products (name, price, image_name, stock_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(name)
        .bind(price)
        .bind(image_name)
        .bind(stock_id)
        .fetch_one(pool)
        .await?;
        ids.push(product_id);
    }

    tracing::info!(count = ids.len(), "Seeded products");
    Ok(ids)
}

/// Insert one historical order per user covering the first seeded product,
/// dated in the past so it shows up as `lastOrderedAt`.
async fn seed_orders(pool: &PgPool, user_ids: &[i32], product_ids: &[i32]) -> Result<(), SeedError> {
    let Some(&product_id) = product_ids.first() else {
        return Ok(());
    };

    for &user_id in user_ids {
        let (order_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, created_at, updated_at)
            VALUES ($1, now() - interval '1 year', now() - interval '1 year')
            RETURNING id
            ",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        sqlx::query(
            r"
            INSERT INTO order_details (order_id, product_id, price, quantity)
            SELECT $1, id, price, 1 FROM products WHERE id = $2
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = user_ids.len(), "Seeded orders");
    Ok(())
}
