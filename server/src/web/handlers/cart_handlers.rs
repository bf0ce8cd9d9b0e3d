// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::cart::{self, AddOutcome};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Option<i64>,
  #[serde(default = "default_quantity")]
  pub quantity: i64,
}

fn default_quantity() -> i64 {
  1
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartRequestPayload {
  pub quantity: Option<i64>,
}

fn parse_cart_item_id(raw: &str) -> Result<i64, AppError> {
  raw
    .parse()
    .map_err(|_| AppError::Validation("El ID debe ser un número válido".to_string()))
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (items, summary) = cart::get_cart(&app_state.db_pool, auth_user.user_id()).await?;
  info!(
    "Cart fetched: {} products, total {}.",
    summary.total_items, summary.total_amount
  );

  let total_items = summary.total_items;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": { "items": items, "summary": summary },
    "message": format!("Carrito obtenido exitosamente - {} productos", total_items),
  })))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload, auth_user),
  fields(user_id = auth_user.user_id())
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let Some(product_id) = req_payload.product_id else {
    return Err(AppError::Validation(
      "El ID del producto es requerido y debe ser válido".to_string(),
    ));
  };

  let outcome = cart::add_item(&app_state.db_pool, auth_user.user_id(), product_id, req_payload.quantity).await?;

  match outcome {
    AddOutcome::Created {
      cart_item_id,
      product_name,
    } => Ok(HttpResponse::Created().json(json!({
      "success": true,
      "message": format!("{} agregado al carrito", product_name),
      "cart_item_id": cart_item_id,
    }))),
    AddOutcome::Merged {
      product_name,
      new_quantity,
    } => Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": format!("Cantidad actualizada - {} unidades de {}", new_quantity, product_name),
    }))),
  }
}

#[instrument(
  name = "handler::update_cart_item",
  skip(app_state, path, req_payload, auth_user),
  fields(user_id = auth_user.user_id())
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<UpdateCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart_item_id = parse_cart_item_id(&path.into_inner())?;
  let quantity = req_payload.quantity.ok_or_else(|| {
    AppError::Validation("La cantidad debe ser un número entero positivo".to_string())
  })?;

  let outcome = cart::update_item(&app_state.db_pool, auth_user.user_id(), cart_item_id, quantity).await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": format!("Cantidad actualizada - {} unidades de {}", outcome.quantity, outcome.product_name),
  })))
}

#[instrument(
  name = "handler::remove_cart_item",
  skip(app_state, path, auth_user),
  fields(user_id = auth_user.user_id())
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart_item_id = parse_cart_item_id(&path.into_inner())?;
  let product_name = cart::remove_item(&app_state.db_pool, auth_user.user_id(), cart_item_id).await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": format!("{} eliminado del carrito", product_name),
  })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let removed = cart::clear_cart(&app_state.db_pool, auth_user.user_id()).await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": format!("Carrito vaciado - {} productos eliminados", removed),
  })))
}

#[instrument(name = "handler::cart_summary", skip(app_state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn cart_summary_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let totals = cart::summary(&app_state.db_pool, auth_user.user_id()).await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": totals,
    "message": "Resumen del carrito obtenido exitosamente",
  })))
}

#[instrument(name = "handler::validate_cart", skip(app_state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn validate_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (items, invalid_items, is_valid) = cart::validate(&app_state.db_pool, auth_user.user_id()).await?;

  let total_items = items.len();
  let invalid_count = invalid_items.len();
  let message = if is_valid {
    "Carrito válido".to_string()
  } else {
    format!("Carrito tiene {} productos con problemas", invalid_count)
  };

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": {
      "is_valid": is_valid,
      "items": items,
      "invalid_items": invalid_items,
      "total_items": total_items,
      "invalid_count": invalid_count,
    },
    "message": message,
  })))
}
