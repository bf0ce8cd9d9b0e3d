// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// HS256 signing key for bearer tokens.
  pub jwt_secret: String,
  /// Token lifetime in seconds. Tokens carry the user's id/username/email.
  pub token_ttl_secs: i64,

  /// Origin allowed by the CORS layer (the storefront client).
  pub cors_origin: String,

  /// Insert the sample catalog on startup when the products table is empty.
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "3001".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").unwrap_or_else(|_| "sqlite://tienda.db?mode=rwc".to_string());

    let jwt_secret = get_env("JWT_SECRET")?;
    let token_ttl_secs = get_env("TOKEN_TTL_SECS")
      .unwrap_or_else(|_| (24 * 60 * 60).to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid TOKEN_TTL_SECS: {}", e)))?;

    let cors_origin = get_env("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      jwt_secret,
      token_ttl_secs,
      cors_origin,
      seed_db,
    })
  }
}
