// server/src/web/auth.rs

//! Bearer-token extractor for protected routes.

use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use crate::errors::AppError;
use crate::services::auth::{verify_token, Claims};
use crate::state::AppState;

/// The verified identity behind a request. Handlers taking this as an
/// argument are only invoked with a valid, unexpired token; a missing
/// header is a 401 and a failed verification a 403 before the handler
/// body runs.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub claims: Claims,
}

impl AuthenticatedUser {
  pub fn user_id(&self) -> i64 {
    self.claims.id
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
      return ready(Err(AppError::Internal("Application state is not configured.".to_string())));
    };

    // "Bearer <token>" — same split the API has always used.
    let token = req
      .headers()
      .get(header::AUTHORIZATION)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| value.split_whitespace().nth(1));

    let Some(token) = token else {
      warn!("Request to a protected route without a bearer token.");
      return ready(Err(AppError::Auth(
        "Se requiere autenticación para acceder a este recurso".to_string(),
      )));
    };

    ready(verify_token(&state.config.jwt_secret, token).map(|claims| AuthenticatedUser { claims }))
  }
}
