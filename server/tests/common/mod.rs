// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

use tienda_server::config::AppConfig;
use tienda_server::db;
use tienda_server::services::auth;
use tienda_server::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// A fresh in-memory database with the schema applied. One connection so
/// every statement sees the same store.
pub async fn memory_pool() -> SqlitePool {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("in-memory sqlite pool");
  db::init_schema(&pool).await.expect("schema init");
  pool
}

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "sqlite::memory:".to_string(),
    jwt_secret: TEST_JWT_SECRET.to_string(),
    token_ttl_secs: 3600,
    cors_origin: "http://localhost:3000".to_string(),
    seed_db: false,
  }
}

pub async fn test_state() -> AppState {
  AppState {
    db_pool: memory_pool().await,
    config: Arc::new(test_config()),
  }
}

pub async fn insert_product(pool: &SqlitePool, name: &str, price: f64, category: &str, stock: i64) -> i64 {
  sqlx::query("INSERT INTO products (name, description, price, category, stock) VALUES (?1, ?2, ?3, ?4, ?5)")
    .bind(name)
    .bind(format!("{} de prueba", name))
    .bind(price)
    .bind(category)
    .bind(stock)
    .execute(pool)
    .await
    .expect("insert product")
    .last_insert_rowid()
}

pub async fn insert_product_described(
  pool: &SqlitePool,
  name: &str,
  description: &str,
  price: f64,
  category: &str,
  stock: i64,
) -> i64 {
  sqlx::query("INSERT INTO products (name, description, price, category, stock) VALUES (?1, ?2, ?3, ?4, ?5)")
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(category)
    .bind(stock)
    .execute(pool)
    .await
    .expect("insert product")
    .last_insert_rowid()
}

/// Inserts a user with a placeholder credential. Cart/catalog tests never
/// log in; auth tests that need a real password hash it themselves.
pub async fn insert_user(pool: &SqlitePool, username: &str, email: &str) -> i64 {
  sqlx::query("INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)")
    .bind(username)
    .bind(email)
    .bind("unusable-hash")
    .execute(pool)
    .await
    .expect("insert user")
    .last_insert_rowid()
}

pub async fn insert_user_with_password(pool: &SqlitePool, username: &str, email: &str, password: &str) -> i64 {
  let hash = auth::hash_password(password).expect("hash password");
  sqlx::query("INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)")
    .bind(username)
    .bind(email)
    .bind(hash)
    .execute(pool)
    .await
    .expect("insert user")
    .last_insert_rowid()
}

pub fn bearer_for(user_id: i64, username: &str, email: &str) -> String {
  auth::mint_token(TEST_JWT_SECRET, 3600, user_id, username, email).expect("mint token")
}

pub async fn product_stock(pool: &SqlitePool, product_id: i64) -> i64 {
  sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
    .bind(product_id)
    .fetch_one(pool)
    .await
    .expect("read stock")
}

pub async fn cart_row_count(pool: &SqlitePool, user_id: i64) -> i64 {
  sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE user_id = ?1")
    .bind(user_id)
    .fetch_one(pool)
    .await
    .expect("count cart rows")
}
