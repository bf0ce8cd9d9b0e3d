// tests/catalog_tests.rs
mod common;

use common::*;
use tienda_server::errors::AppError;
use tienda_server::services::catalog::{self, ProductFilter};

#[tokio::test]
async fn get_returns_product_or_not_found() {
  let pool = memory_pool().await;
  let id = insert_product(&pool, "Pintura Acrílica Azul", 17.25, "Pinturas", 42).await;

  let product = catalog::get(&pool, id).await.unwrap();
  assert_eq!(product.name, "Pintura Acrílica Azul");
  assert_eq!(product.price, 17.25);

  assert!(matches!(catalog::get(&pool, 999).await.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn search_ranks_name_then_category_then_description() {
  let pool = memory_pool().await;
  // Description-only match
  insert_product_described(&pool, "Spray Negro", "Pintura en spray color negro", 8.99, "Sprays", 30).await;
  // Category match
  insert_product_described(&pool, "Esmalte Azul", "Esmalte sintético brillante", 14.00, "Pinturas", 10).await;
  // Name matches, two of them to check the alphabetical tie-break
  insert_product_described(&pool, "Pintura Verde", "Color verde bosque", 19.75, "Acrílicos", 28).await;
  insert_product_described(&pool, "Pintura Blanca", "Color blanco mate", 15.99, "Acrílicos", 50).await;
  // No match at all
  insert_product_described(&pool, "Guantes de Nitrilo", "Resistentes a químicos", 8.25, "Accesorios", 90).await;

  let results = catalog::search(&pool, "pintura").await.unwrap();
  let names: Vec<&str> = results.iter().map(|p| p.name.as_str()).collect();

  assert_eq!(names, vec!["Pintura Blanca", "Pintura Verde", "Esmalte Azul", "Spray Negro"]);
}

#[tokio::test]
async fn search_is_case_insensitive() {
  let pool = memory_pool().await;
  insert_product(&pool, "Pintura Acrílica Roja", 18.50, "Pinturas", 35).await;

  let results = catalog::search(&pool, "PINTURA").await.unwrap();
  assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn filter_composes_category_and_price_window() {
  let pool = memory_pool().await;
  insert_product(&pool, "Pincel Plano N°2", 5.50, "Pinceles", 75).await;
  insert_product(&pool, "Pincel Redondo N°6", 7.25, "Pinceles", 60).await;
  insert_product(&pool, "Pincel Brocha 3\"", 12.00, "Pinceles", 25).await;
  insert_product(&pool, "Rodillo Antigoteo", 8.75, "Rodillos", 40).await;

  let criteria = ProductFilter::from_raw(Some("Pinceles"), Some("5"), Some("10")).unwrap();
  let results = catalog::filter(&pool, &criteria).await.unwrap();

  let names: Vec<&str> = results.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, vec!["Pincel Plano N°2", "Pincel Redondo N°6"]);
  // Price ascending within the window
  assert!(results[0].price <= results[1].price);
}

#[tokio::test]
async fn filter_without_criteria_returns_catalog_cheapest_first() {
  let pool = memory_pool().await;
  insert_product(&pool, "Barniz Mate", 24.99, "Barnices", 20).await;
  insert_product(&pool, "Rodillo Mini", 4.25, "Rodillos", 55).await;
  insert_product(&pool, "Spray Plateado", 10.50, "Sprays", 25).await;

  let criteria = ProductFilter::from_raw(None, None, None).unwrap();
  let results = catalog::filter(&pool, &criteria).await.unwrap();

  let prices: Vec<f64> = results.iter().map(|p| p.price).collect();
  assert_eq!(prices, vec![4.25, 10.50, 24.99]);
}

#[tokio::test]
async fn filter_rejects_malformed_numbers() {
  assert!(matches!(
    ProductFilter::from_raw(None, Some("abc"), None).unwrap_err(),
    AppError::Validation(_)
  ));
  assert!(matches!(
    ProductFilter::from_raw(None, None, Some("10,50")).unwrap_err(),
    AppError::Validation(_)
  ));

  // Blank values mean "no filter", they are not errors.
  let criteria = ProductFilter::from_raw(Some("  "), Some(""), None).unwrap();
  assert!(criteria.category.is_none());
  assert!(criteria.min_price.is_none());
}

#[tokio::test]
async fn categories_are_counted_and_sorted() {
  let pool = memory_pool().await;
  insert_product(&pool, "Pintura Blanca", 15.99, "Pinturas", 50).await;
  insert_product(&pool, "Pintura Roja", 18.50, "Pinturas", 35).await;
  insert_product(&pool, "Pincel Plano", 5.50, "Pinceles", 75).await;

  let categories = catalog::categories(&pool).await.unwrap();
  assert_eq!(categories.len(), 2);
  assert_eq!(categories[0].category, "Pinceles");
  assert_eq!(categories[0].product_count, 1);
  assert_eq!(categories[1].category, "Pinturas");
  assert_eq!(categories[1].product_count, 2);
}

#[tokio::test]
async fn price_range_reports_min_max_avg() {
  let pool = memory_pool().await;
  insert_product(&pool, "Rodillo Mini", 4.25, "Rodillos", 55).await;
  insert_product(&pool, "Spray Plateado", 10.50, "Sprays", 25).await;
  insert_product(&pool, "Barniz Mate", 24.99, "Barnices", 20).await;

  let range = catalog::price_range(&pool).await.unwrap();
  assert_eq!(range.min_price, 4.25);
  assert_eq!(range.max_price, 24.99);
  // (4.25 + 10.50 + 24.99) / 3 = 13.246..., reported to 2 decimals
  assert_eq!(range.avg_price, 13.25);
  assert_eq!(range.total_products, 3);
}

#[tokio::test]
async fn price_range_on_empty_catalog_is_zeroed() {
  let pool = memory_pool().await;

  let range = catalog::price_range(&pool).await.unwrap();
  assert_eq!(range.min_price, 0.0);
  assert_eq!(range.max_price, 0.0);
  assert_eq!(range.avg_price, 0.0);
  assert_eq!(range.total_products, 0);
}

#[tokio::test]
async fn seeded_catalog_matches_the_sample_set() {
  let pool = memory_pool().await;
  let inserted = tienda_server::db::seed_products(&pool).await.unwrap();
  assert_eq!(inserted, 25);

  // Seeding is idempotent: a populated table is left alone.
  assert_eq!(tienda_server::db::seed_products(&pool).await.unwrap(), 0);

  let products = catalog::list(&pool).await.unwrap();
  assert_eq!(products.len(), 25);
  assert!(products.iter().all(|p| p.price >= 0.0 && p.stock >= 0));

  let criteria = ProductFilter::from_raw(Some("Pinceles"), Some("5"), Some("10")).unwrap();
  let pinceles = catalog::filter(&pool, &criteria).await.unwrap();
  let names: Vec<&str> = pinceles.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, vec!["Pincel Plano N°2", "Pincel Redondo N°6"]);
}
