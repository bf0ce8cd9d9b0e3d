// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::catalog::{self, ProductFilter};
use crate::state::AppState;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
  pub q: Option<String>,
}

/// Raw filter parameters. Numbers arrive as strings so malformed values
/// can be rejected with a field-level message instead of the framework's
/// default deserialization error.
#[derive(Deserialize, Debug)]
pub struct FilterQuery {
  pub category: Option<String>,
  #[serde(rename = "minPrice")]
  pub min_price: Option<String>,
  #[serde(rename = "maxPrice")]
  pub max_price: Option<String>,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = catalog::list(&app_state.db_pool).await?;
  let count = products.len();
  info!("Listed {} products.", count);

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": products,
    "count": count,
    "message": "Productos obtenidos exitosamente",
  })))
}

#[instrument(name = "handler::search_products", skip(app_state, query))]
pub async fn search_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
  let Some(term) = query.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
    return Err(AppError::Validation(
      "Debe proporcionar un término de búsqueda con el parámetro \"q\"".to_string(),
    ));
  };

  let products = catalog::search(&app_state.db_pool, term).await?;
  let count = products.len();
  info!("Search for \"{}\" matched {} products.", term, count);

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": products,
    "count": count,
    "searchTerm": term,
    "message": format!("Se encontraron {} productos", count),
  })))
}

#[instrument(name = "handler::filter_products", skip(app_state, query))]
pub async fn filter_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<FilterQuery>,
) -> Result<HttpResponse, AppError> {
  let criteria = ProductFilter::from_raw(
    query.category.as_deref(),
    query.min_price.as_deref(),
    query.max_price.as_deref(),
  )?;

  let products = catalog::filter(&app_state.db_pool, &criteria).await?;
  let count = products.len();

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": products,
    "count": count,
    "filters": {
      "category": criteria.category,
      "minPrice": criteria.min_price,
      "maxPrice": criteria.max_price,
    },
    "message": format!("Se encontraron {} productos con los filtros aplicados", count),
  })))
}

#[instrument(name = "handler::product_categories", skip(app_state))]
pub async fn categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog::categories(&app_state.db_pool).await?;
  let count = categories.len();

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": categories,
    "count": count,
    "message": "Categorías obtenidas exitosamente",
  })))
}

#[instrument(name = "handler::price_range", skip(app_state))]
pub async fn price_range_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let range = catalog::price_range(&app_state.db_pool).await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": range,
    "message": "Rango de precios obtenido exitosamente",
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let raw_id = path.into_inner();
  let product_id: i64 = raw_id
    .parse()
    .map_err(|_| AppError::Validation("El ID debe ser un número válido".to_string()))?;

  let product = catalog::get(&app_state.db_pool, product_id).await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": product,
    "message": "Producto encontrado exitosamente",
  })))
}
