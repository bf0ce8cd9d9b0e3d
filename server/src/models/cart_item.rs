// server/src/models/cart_item.rs

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// One row of the cart_items table. One row per (user, product) pair;
/// adding an already-present product merges quantities instead of
/// duplicating the row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
  pub id: i64,
  pub user_id: i64,
  pub product_id: i64,
  pub quantity: i64,
  pub created_at: NaiveDateTime,
}

/// A cart row joined with current product data, as served by GET /cart.
/// `subtotal` is computed in the query from current price, never stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub cart_item_id: i64,
  pub quantity: i64,
  pub added_at: NaiveDateTime,
  pub product_id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price: f64,
  pub category: String,
  pub stock: i64,
  pub image_url: Option<String>,
  pub subtotal: f64,
}

/// Aggregate attached to the GET /cart item list.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
  /// Sum of quantities across all rows.
  pub total_items: i64,
  /// Sum of line subtotals, rounded to 2 decimal places.
  pub total_amount: f64,
}

/// The standalone GET /cart/summary aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct CartTotals {
  /// Number of cart rows (distinct products).
  pub total_items: i64,
  /// Sum of quantities.
  pub total_quantity: i64,
  pub total_amount: f64,
}

/// One row of the validate-cart read. `status` is either "valid" or
/// "insufficient_stock" depending on quantity vs. current stock.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ValidatedCartItem {
  pub cart_item_id: i64,
  pub quantity: i64,
  pub product_id: i64,
  pub name: String,
  pub price: f64,
  pub stock: i64,
  pub status: String,
}
