// server/src/models/user.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send the credential to a client
  pub password: String,
  pub created_at: NaiveDateTime,
}

/// The identity subset returned alongside freshly minted tokens.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
  pub id: i64,
  pub username: String,
  pub email: String,
}

impl From<&User> for PublicUser {
  fn from(user: &User) -> Self {
    PublicUser {
      id: user.id,
      username: user.username.clone(),
      email: user.email.clone(),
    }
  }
}
