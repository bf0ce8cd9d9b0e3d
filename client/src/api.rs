// client/src/api.rs

//! Typed client for the backend HTTP API.
//!
//! Every response travels in the `{success, data, message}` envelope;
//! failures carry `{success: false, error, message}` and surface here as
//! [`ClientError::Api`] with the server's message verbatim. Nothing is
//! retried; callers decide whether to try again.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::local_cart::LocalCart;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  /// The server answered with a failure envelope. `message` is shown to
  /// the user verbatim.
  #[error("{error}: {message}")]
  Api {
    status: u16,
    error: String,
    message: String,
  },

  #[error("Unexpected response shape: {0}")]
  Decode(String),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

// --- Response models ---

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
  pub id: i64,
  pub username: String,
  pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
  pub user: UserInfo,
  pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price: f64,
  pub category: String,
  pub stock: i64,
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
  pub cart_item_id: i64,
  pub quantity: i64,
  pub product_id: i64,
  pub name: String,
  pub price: f64,
  pub stock: i64,
  pub subtotal: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartSummary {
  pub total_items: i64,
  pub total_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartView {
  pub items: Vec<CartLine>,
  pub summary: CartSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartTotals {
  pub total_items: i64,
  pub total_quantity: i64,
  pub total_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatedItem {
  pub cart_item_id: i64,
  pub quantity: i64,
  pub product_id: i64,
  pub name: String,
  pub stock: i64,
  pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationReport {
  pub is_valid: bool,
  pub items: Vec<ValidatedItem>,
  pub invalid_items: Vec<ValidatedItem>,
  pub invalid_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCount {
  pub category: String,
  pub product_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceRange {
  #[serde(rename = "minPrice")]
  pub min_price: f64,
  #[serde(rename = "maxPrice")]
  pub max_price: f64,
  #[serde(rename = "avgPrice")]
  pub avg_price: f64,
  #[serde(rename = "totalProducts")]
  pub total_products: i64,
}

/// Outcome of adding one item, distinguishing a fresh row from a merge.
#[derive(Debug, Clone)]
pub struct CartAddOutcome {
  pub created: bool,
  pub cart_item_id: Option<i64>,
  pub message: String,
}

/// Result of replaying the local mirror against the server.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
  pub pushed: usize,
  /// (product_id, server message) for every entry the server rejected.
  pub rejected: Vec<(i64, String)>,
}

// --- Client ---

pub struct ApiClient {
  base_url: String,
  http: reqwest::Client,
  token: Option<String>,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    ApiClient {
      base_url: base_url.into(),
      http: reqwest::Client::new(),
      token: None,
    }
  }

  /// The bearer token presented on protected routes, if any. Set by
  /// login/register/refresh; cleared by [`logout`](Self::logout).
  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  /// Discards the held token. The storefront does this immediately when
  /// the server reports an expired token.
  pub fn logout(&mut self) {
    self.token = None;
  }

  async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let url = format!("{}{}", self.base_url, path);
    let mut request = self.http.request(method, &url);
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }
    if let Some(body) = body {
      request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let payload: Value = response
      .json()
      .await
      .map_err(|e| ClientError::Decode(format!("response body is not JSON: {}", e)))?;

    if !status.is_success() || payload["success"] != Value::Bool(true) {
      let error = payload["error"].as_str().unwrap_or("Error").to_string();
      let message = payload["message"].as_str().unwrap_or_default().to_string();
      warn!(status = status.as_u16(), %error, "API call failed: {}", message);
      return Err(ClientError::Api {
        status: status.as_u16(),
        error,
        message,
      });
    }

    Ok((status, payload))
  }

  fn data<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload["data"].clone()).map_err(|e| ClientError::Decode(e.to_string()))
  }

  // --- Auth ---

  #[instrument(name = "api::register", skip(self, password))]
  pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Result<AuthSession> {
    let (_, payload) = self
      .send(
        Method::POST,
        "/api/auth/register",
        Some(json!({ "username": username, "email": email, "password": password })),
      )
      .await?;
    let session: AuthSession = Self::data(payload)?;
    self.token = Some(session.token.clone());
    info!("Registered and authenticated as user {}.", session.user.id);
    Ok(session)
  }

  /// Logs in with an email address or a username; the backend matches
  /// either column.
  #[instrument(name = "api::login", skip(self, password))]
  pub async fn login(&mut self, identifier: &str, password: &str) -> Result<AuthSession> {
    let (_, payload) = self
      .send(
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": identifier, "password": password })),
      )
      .await?;
    let session: AuthSession = Self::data(payload)?;
    self.token = Some(session.token.clone());
    Ok(session)
  }

  pub async fn profile(&self) -> Result<UserInfo> {
    let (_, payload) = self.send(Method::GET, "/api/auth/profile", None).await?;
    serde_json::from_value(payload["data"]["user"].clone()).map_err(|e| ClientError::Decode(e.to_string()))
  }

  pub async fn verify(&self) -> Result<UserInfo> {
    let (_, payload) = self.send(Method::POST, "/api/auth/verify", None).await?;
    serde_json::from_value(payload["data"]["user"].clone()).map_err(|e| ClientError::Decode(e.to_string()))
  }

  /// Mints a fresh token and replaces the held one.
  pub async fn refresh(&mut self) -> Result<AuthSession> {
    let (_, payload) = self.send(Method::POST, "/api/auth/refresh", None).await?;
    let session: AuthSession = Self::data(payload)?;
    self.token = Some(session.token.clone());
    Ok(session)
  }

  // --- Catalog ---

  pub async fn products(&self) -> Result<Vec<Product>> {
    let (_, payload) = self.send(Method::GET, "/api/products", None).await?;
    Self::data(payload)
  }

  pub async fn product(&self, product_id: i64) -> Result<Product> {
    let (_, payload) = self.send(Method::GET, &format!("/api/products/{}", product_id), None).await?;
    Self::data(payload)
  }

  pub async fn search(&self, term: &str) -> Result<Vec<Product>> {
    let path = format!("/api/products/search?q={}", urlencode(term));
    let (_, payload) = self.send(Method::GET, &path, None).await?;
    Self::data(payload)
  }

  pub async fn filter(
    &self,
    category: Option<&str>,
    min_price: Option<f64>,
    max_price: Option<f64>,
  ) -> Result<Vec<Product>> {
    let mut params = Vec::new();
    if let Some(category) = category {
      params.push(format!("category={}", urlencode(category)));
    }
    if let Some(min_price) = min_price {
      params.push(format!("minPrice={}", min_price));
    }
    if let Some(max_price) = max_price {
      params.push(format!("maxPrice={}", max_price));
    }
    let path = if params.is_empty() {
      "/api/products/filter".to_string()
    } else {
      format!("/api/products/filter?{}", params.join("&"))
    };

    let (_, payload) = self.send(Method::GET, &path, None).await?;
    Self::data(payload)
  }

  pub async fn categories(&self) -> Result<Vec<CategoryCount>> {
    let (_, payload) = self.send(Method::GET, "/api/products/categories", None).await?;
    Self::data(payload)
  }

  pub async fn price_range(&self) -> Result<PriceRange> {
    let (_, payload) = self.send(Method::GET, "/api/products/price-range", None).await?;
    Self::data(payload)
  }

  // --- Cart ---

  pub async fn cart(&self) -> Result<CartView> {
    let (_, payload) = self.send(Method::GET, "/api/cart", None).await?;
    Self::data(payload)
  }

  pub async fn cart_add(&self, product_id: i64, quantity: i64) -> Result<CartAddOutcome> {
    let (status, payload) = self
      .send(
        Method::POST,
        "/api/cart/add",
        Some(json!({ "product_id": product_id, "quantity": quantity })),
      )
      .await?;

    Ok(CartAddOutcome {
      created: status == StatusCode::CREATED,
      cart_item_id: payload["cart_item_id"].as_i64(),
      message: payload["message"].as_str().unwrap_or_default().to_string(),
    })
  }

  pub async fn cart_update(&self, cart_item_id: i64, quantity: i64) -> Result<String> {
    let (_, payload) = self
      .send(
        Method::PUT,
        &format!("/api/cart/update/{}", cart_item_id),
        Some(json!({ "quantity": quantity })),
      )
      .await?;
    Ok(payload["message"].as_str().unwrap_or_default().to_string())
  }

  pub async fn cart_remove(&self, cart_item_id: i64) -> Result<String> {
    let (_, payload) = self
      .send(Method::DELETE, &format!("/api/cart/remove/{}", cart_item_id), None)
      .await?;
    Ok(payload["message"].as_str().unwrap_or_default().to_string())
  }

  pub async fn cart_clear(&self) -> Result<String> {
    let (_, payload) = self.send(Method::DELETE, "/api/cart/clear", None).await?;
    Ok(payload["message"].as_str().unwrap_or_default().to_string())
  }

  pub async fn cart_summary(&self) -> Result<CartTotals> {
    let (_, payload) = self.send(Method::GET, "/api/cart/summary", None).await?;
    Self::data(payload)
  }

  pub async fn cart_validate(&self) -> Result<ValidationReport> {
    let (_, payload) = self.send(Method::POST, "/api/cart/validate", None).await?;
    Self::data(payload)
  }

  /// Replays the local mirror through the server cart, one add per entry.
  /// The server stays authoritative for stock: per-item rejections are
  /// collected into the report instead of aborting the sync, while
  /// transport failures abort immediately.
  #[instrument(name = "api::push_to_server", skip(self, local))]
  pub async fn push_to_server(&self, local: &LocalCart) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    for entry in local.items() {
      match self.cart_add(entry.product.id, entry.quantity).await {
        Ok(_) => report.pushed += 1,
        Err(ClientError::Api { message, .. }) => {
          warn!(product_id = entry.product.id, "Server rejected cart entry: {}", message);
          report.rejected.push((entry.product.id, message));
        }
        Err(other) => return Err(other),
      }
    }

    info!("Cart sync finished: {} pushed, {} rejected.", report.pushed, report.rejected.len());
    Ok(report)
  }
}

/// Minimal percent-encoding for query values; only what the storefront's
/// search and category names need.
fn urlencode(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for byte in raw.bytes() {
    match byte {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
      b' ' => out.push_str("%20"),
      other => out.push_str(&format!("%{:02X}", other)),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn data_extraction_reads_the_envelope() {
    let payload = json!({
      "success": true,
      "data": { "user": { "id": 1, "username": "ana", "email": "ana@example.com" }, "token": "t" },
      "message": "Login exitoso"
    });
    let session: AuthSession = ApiClient::data(payload).unwrap();
    assert_eq!(session.user.username, "ana");
    assert_eq!(session.token, "t");
  }

  #[test]
  fn data_extraction_rejects_shape_mismatch() {
    let payload = json!({ "success": true, "data": { "unexpected": true } });
    let result: Result<AuthSession> = ApiClient::data(payload);
    assert!(matches!(result, Err(ClientError::Decode(_))));
  }

  #[test]
  fn urlencode_handles_spaces_and_unicode() {
    assert_eq!(urlencode("pintura azul"), "pintura%20azul");
    assert_eq!(urlencode("Pinceles"), "Pinceles");
    assert_eq!(urlencode("N°6"), "N%C2%B06");
  }
}
