// server/src/services/auth.rs

//! Password hashing/verification and bearer-token mint/verify.
//!
//! Everything here is pure computation over the caller-supplied secret;
//! the signing key lives in `AppConfig`, not in this module.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// Claims carried by every bearer token: the user's identity plus
/// issued-at/expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub id: i64,
  pub username: String,
  pub email: String,
  pub iat: i64,
  pub exp: i64,
}

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty for hashing.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let argon2_hasher = Argon2::default();

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash) => Ok(password_hash.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on a clean mismatch; an error only when the stored
/// hash cannot be parsed or verification itself fails.
#[instrument(name = "auth::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {}", other)))
    }
  }
}

/// Mints a signed token for the given identity, valid for `ttl_secs`.
#[instrument(name = "auth::mint_token", skip(secret), fields(user_id = id), err(Display))]
pub fn mint_token(secret: &str, ttl_secs: i64, id: i64, username: &str, email: &str) -> Result<String, AppError> {
  let now = chrono::Utc::now().timestamp();
  let claims = Claims {
    id,
    username: username.to_string(),
    email: email.to_string(),
    iat: now,
    exp: now + ttl_secs,
  };

  encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Verifies a presented token and returns its claims. Expiry is checked
/// here; callers only see valid identities.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
  decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken("El token de autenticación no es válido".to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_round_trip() {
    let hash = hash_password("secreto123").unwrap();
    assert!(verify_password(&hash, "secreto123").unwrap());
    assert!(!verify_password(&hash, "otro-password").unwrap());
  }

  #[test]
  fn hashes_are_salted() {
    let a = hash_password("secreto123").unwrap();
    let b = hash_password("secreto123").unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn minted_token_verifies_and_carries_identity() {
    let token = mint_token("test-secret", 3600, 7, "ana", "ana@example.com").unwrap();
    let claims = verify_token("test-secret", &token).unwrap();
    assert_eq!(claims.id, 7);
    assert_eq!(claims.username, "ana");
    assert_eq!(claims.email, "ana@example.com");
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn token_with_wrong_secret_is_rejected() {
    let token = mint_token("test-secret", 3600, 7, "ana", "ana@example.com").unwrap();
    assert!(verify_token("another-secret", &token).is_err());
  }

  #[test]
  fn expired_token_is_rejected() {
    // jsonwebtoken applies a default 60s leeway; go well past it.
    let token = mint_token("test-secret", -120, 7, "ana", "ana@example.com").unwrap();
    assert!(verify_token("test-secret", &token).is_err());
  }
}
