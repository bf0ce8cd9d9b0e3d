// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{PublicUser, User};
use crate::services::auth::{hash_password, mint_token, verify_password};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub username: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
}

/// Login accepts either field; whichever is present is matched against
/// both the username and email columns.
#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
}

const MIN_PASSWORD_LEN: usize = 6;

// --- Handler Implementations ---

#[instrument(name = "handler::register", skip(app_state, req_payload))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();

  let (Some(username), Some(email), Some(password)) = (
    payload.username.as_deref().map(str::trim).filter(|v| !v.is_empty()),
    payload.email.as_deref().map(str::trim).filter(|v| !v.is_empty()),
    payload.password.as_deref().filter(|v| !v.is_empty()),
  ) else {
    return Err(AppError::Validation(
      "Username, email y password son requeridos".to_string(),
    ));
  };

  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(
      "El password debe tener al menos 6 caracteres".to_string(),
    ));
  }

  info!("Registration attempt for username: {}", username);

  let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1 OR email = ?2")
    .bind(username)
    .bind(email)
    .fetch_optional(&app_state.db_pool)
    .await?;

  if existing.is_some() {
    warn!("Registration rejected, identity already taken: {}", username);
    return Err(AppError::Conflict("El username o email ya están registrados".to_string()));
  }

  let password_hash = hash_password(password)?;

  // A concurrent registration can still slip past the pre-check; the
  // UNIQUE columns turn that into a database error mapped back to 409.
  let result = sqlx::query("INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)")
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .execute(&app_state.db_pool)
    .await
    .map_err(|e| match e.as_database_error() {
      Some(db_err) if db_err.is_unique_violation() => {
        AppError::Conflict("El username o email ya están registrados".to_string())
      }
      _ => AppError::Sqlx(e),
    })?;

  let user_id = result.last_insert_rowid();
  let token = mint_token(
    &app_state.config.jwt_secret,
    app_state.config.token_ttl_secs,
    user_id,
    username,
    email,
  )?;

  info!("User registered successfully, id: {}", user_id);

  Ok(HttpResponse::Created().json(json!({
    "success": true,
    "message": "Usuario registrado exitosamente",
    "data": {
      "user": { "id": user_id, "username": username, "email": email },
      "token": token,
    }
  })))
}

#[instrument(name = "handler::login", skip(app_state, req_payload))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();

  let identifier = payload
    .email
    .as_deref()
    .or(payload.username.as_deref())
    .map(str::trim)
    .filter(|v| !v.is_empty());
  let password = payload.password.as_deref().filter(|v| !v.is_empty());

  let (Some(identifier), Some(password)) = (identifier, password) else {
    return Err(AppError::Validation(
      "Email o username y password son requeridos".to_string(),
    ));
  };

  info!("Login attempt for identifier: {}", identifier);

  let user: Option<User> = sqlx::query_as(
    "SELECT id, username, email, password, created_at FROM users WHERE username = ?1 OR email = ?1",
  )
  .bind(identifier)
  .fetch_optional(&app_state.db_pool)
  .await?;

  let user = user.ok_or_else(|| AppError::NotFound("Las credenciales no son válidas".to_string()))?;

  if !verify_password(&user.password, password)? {
    warn!("Login rejected for user {}: bad password.", user.id);
    return Err(AppError::Auth("Las credenciales no son válidas".to_string()));
  }

  let token = mint_token(
    &app_state.config.jwt_secret,
    app_state.config.token_ttl_secs,
    user.id,
    &user.username,
    &user.email,
  )?;

  info!("Login successful for user {}.", user.id);

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Login exitoso",
    "data": {
      "user": PublicUser::from(&user),
      "token": token,
    }
  })))
}

#[instrument(name = "handler::profile", skip(app_state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user: Option<User> = sqlx::query_as("SELECT id, username, email, password, created_at FROM users WHERE id = ?1")
    .bind(auth_user.user_id())
    .fetch_optional(&app_state.db_pool)
    .await?;

  // The token can outlive the row it was minted for.
  let user = user.ok_or_else(|| AppError::NotFound("El usuario no existe".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": { "user": user },
    "message": "Perfil obtenido exitosamente",
  })))
}

/// Echoes the verified claims back. The extractor has already done all
/// the work by the time this body runs.
pub async fn verify_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": {
      "user": {
        "id": auth_user.claims.id,
        "username": auth_user.claims.username,
        "email": auth_user.claims.email,
      }
    },
    "message": "Token válido",
  })))
}

#[instrument(name = "handler::refresh", skip(app_state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn refresh_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let token = mint_token(
    &app_state.config.jwt_secret,
    app_state.config.token_ttl_secs,
    auth_user.claims.id,
    &auth_user.claims.username,
    &auth_user.claims.email,
  )?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": {
      "token": token,
      "user": {
        "id": auth_user.claims.id,
        "username": auth_user.claims.username,
        "email": auth_user.claims.email,
      }
    },
    "message": "Token renovado exitosamente",
  })))
}

pub async fn status_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "success": true,
    "data": {
      "service": "Authentication Service",
      "status": "active",
      "version": env!("CARGO_PKG_VERSION"),
      "timestamp": chrono::Utc::now().to_rfc3339(),
    },
    "message": "Servicio de autenticación funcionando correctamente",
  }))
}
