// server/src/web/mod.rs

// Declare child modules
pub mod auth;
pub mod handlers;
pub mod routes;

pub use routes::configure_app_routes;

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

/// Folds malformed request bodies into the same error envelope every other
/// failure uses, instead of actix's default plain-text body.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  let detail = err.to_string();
  actix_web::error::InternalError::from_response(
    err,
    HttpResponse::BadRequest().json(json!({
      "success": false,
      "error": "Datos inválidos",
      "message": detail,
    })),
  )
  .into()
}
