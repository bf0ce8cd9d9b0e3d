// server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Auth(String),

  /// A token was presented but did not verify (malformed, bad signature,
  /// expired). Distinct from `Auth`, which covers a missing credential.
  #[error("{0}")]
  InvalidToken(String),

  #[error("{0}")]
  NotFound(String),

  /// Requested quantity cannot be satisfied by current stock. The message
  /// carries the remaining count so clients can show it verbatim.
  #[error("{0}")]
  InsufficientStock(String),

  #[error("{0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Short label for the `error` field of the response envelope.
  fn label(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "Datos inválidos",
      AppError::Auth(_) => "No autorizado",
      AppError::InvalidToken(_) => "Token inválido",
      AppError::NotFound(_) => "No encontrado",
      AppError::InsufficientStock(_) => "Stock insuficiente",
      AppError::Conflict(_) => "Conflicto",
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => "Error interno del servidor",
    }
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in code that uses `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    let body = |message: &str| json!({ "success": false, "error": self.label(), "message": message });
    match self {
      AppError::Validation(m) | AppError::InsufficientStock(m) => HttpResponse::BadRequest().json(body(m)),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(body(m)),
      AppError::InvalidToken(m) => HttpResponse::Forbidden().json(body(m)),
      AppError::NotFound(m) => HttpResponse::NotFound().json(body(m)),
      AppError::Conflict(m) => HttpResponse::Conflict().json(body(m)),
      AppError::Config(m) | AppError::Internal(m) => {
        // Operational detail stays out of release builds; the envelope shape
        // is the same either way.
        let detail = if cfg!(debug_assertions) { m.as_str() } else { "Error interno del servidor" };
        HttpResponse::InternalServerError().json(body(detail))
      }
      AppError::Sqlx(e) => {
        let detail = if cfg!(debug_assertions) { e.to_string() } else { "Error interno del servidor".to_string() };
        HttpResponse::InternalServerError().json(body(&detail))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
