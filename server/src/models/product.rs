// server/src/models/product.rs

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price: f64,
  pub category: String,
  pub stock: i64,
  pub image_url: Option<String>,
  pub created_at: NaiveDateTime,
}

/// One row of the category aggregation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryCount {
  pub category: String,
  pub product_count: i64,
}

/// Catalog price statistics. Zeroed when the catalog is empty.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRange {
  #[serde(rename = "minPrice")]
  pub min_price: f64,
  #[serde(rename = "maxPrice")]
  pub max_price: f64,
  #[serde(rename = "avgPrice")]
  pub avg_price: f64,
  #[serde(rename = "totalProducts")]
  pub total_products: i64,
}
