// server/src/services/catalog.rs

//! Read-only catalog queries: listing, lookup, search, filter and the
//! category/price aggregations. Nothing here mutates product rows.

use crate::errors::{AppError, Result};
use crate::models::{CategoryCount, PriceRange, Product};
use crate::services::round2;
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;
use tracing::instrument;

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, stock, image_url, created_at";

#[instrument(name = "catalog::list", skip(pool))]
pub async fn list(pool: &SqlitePool) -> Result<Vec<Product>> {
  let products = sqlx::query_as::<_, Product>(&format!(
    "SELECT {} FROM products ORDER BY created_at DESC",
    PRODUCT_COLUMNS
  ))
  .fetch_all(pool)
  .await?;
  Ok(products)
}

#[instrument(name = "catalog::get", skip(pool))]
pub async fn get(pool: &SqlitePool, product_id: i64) -> Result<Product> {
  let product = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

  product.ok_or_else(|| AppError::NotFound(format!("No se encontró un producto con ID {}", product_id)))
}

/// Case-insensitive substring search over name/description/category.
/// Name matches rank first, category matches second, description-only
/// matches last; alphabetical by name within a tier.
#[instrument(name = "catalog::search", skip(pool))]
pub async fn search(pool: &SqlitePool, term: &str) -> Result<Vec<Product>> {
  let pattern = format!("%{}%", term.trim());

  let products = sqlx::query_as::<_, Product>(&format!(
    r#"
    SELECT {}
    FROM products
    WHERE name LIKE ?1 OR description LIKE ?1 OR category LIKE ?1
    ORDER BY
      CASE
        WHEN name LIKE ?1 THEN 1
        WHEN category LIKE ?1 THEN 2
        ELSE 3
      END,
      name ASC
    "#,
    PRODUCT_COLUMNS
  ))
  .bind(&pattern)
  .fetch_all(pool)
  .await?;

  Ok(products)
}

/// Validated filter criteria. Construction is the only place the raw query
/// strings are touched; malformed numbers are rejected there, never
/// silently dropped.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
  pub category: Option<String>,
  pub min_price: Option<f64>,
  pub max_price: Option<f64>,
}

impl ProductFilter {
  pub fn from_raw(category: Option<&str>, min_price: Option<&str>, max_price: Option<&str>) -> Result<Self> {
    let parse_price = |raw: Option<&str>, field: &str| -> Result<Option<f64>> {
      match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
          .trim()
          .parse::<f64>()
          .map(Some)
          .map_err(|_| AppError::Validation(format!("El parámetro {} debe ser un número válido", field))),
      }
    };

    // A blank category means "no category filter", matching how the API
    // has always treated it.
    let category = category.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string);

    Ok(ProductFilter {
      category,
      min_price: parse_price(min_price, "minPrice")?,
      max_price: parse_price(max_price, "maxPrice")?,
    })
  }
}

/// Applies an arbitrary subset of {category, minPrice, maxPrice}
/// conjunctively. No criteria returns the whole catalog, cheapest first.
#[instrument(name = "catalog::filter", skip(pool))]
pub async fn filter(pool: &SqlitePool, criteria: &ProductFilter) -> Result<Vec<Product>> {
  let mut qb: QueryBuilder<sqlx::Sqlite> =
    QueryBuilder::new(format!("SELECT {} FROM products WHERE 1=1", PRODUCT_COLUMNS));

  if let Some(category) = &criteria.category {
    qb.push(" AND category = ").push_bind(category.clone());
  }
  if let Some(min_price) = criteria.min_price {
    qb.push(" AND price >= ").push_bind(min_price);
  }
  if let Some(max_price) = criteria.max_price {
    qb.push(" AND price <= ").push_bind(max_price);
  }
  qb.push(" ORDER BY price ASC, name ASC");

  let products = qb.build_query_as::<Product>().fetch_all(pool).await?;
  Ok(products)
}

#[instrument(name = "catalog::categories", skip(pool))]
pub async fn categories(pool: &SqlitePool) -> Result<Vec<CategoryCount>> {
  let rows = sqlx::query_as::<_, CategoryCount>(
    "SELECT category, COUNT(*) as product_count FROM products GROUP BY category ORDER BY category ASC",
  )
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

#[instrument(name = "catalog::price_range", skip(pool))]
pub async fn price_range(pool: &SqlitePool) -> Result<PriceRange> {
  let (min_price, max_price, avg_price, total_products): (Option<f64>, Option<f64>, Option<f64>, i64) =
    sqlx::query_as("SELECT MIN(price), MAX(price), AVG(price), COUNT(*) FROM products")
      .fetch_one(pool)
      .await?;

  Ok(PriceRange {
    min_price: min_price.unwrap_or(0.0),
    max_price: max_price.unwrap_or(0.0),
    avg_price: round2(avg_price.unwrap_or(0.0)),
    total_products,
  })
}
