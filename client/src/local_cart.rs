// client/src/local_cart.rs

//! The client-side cart mirror: an optimistic, locally persisted cart
//! keyed by product id, independent of the server's cart rows.
//!
//! Semantics mirror what the storefront UI has always done: adding a
//! product already present increments its quantity, setting a quantity to
//! zero or below removes the entry, and both totals are recomputed by
//! summation on every read.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name of the persisted cart, the client's fixed storage key.
pub const STORAGE_KEY: &str = "cart.json";

/// The product snapshot a cart entry carries. Taken at add time; the
/// server remains authoritative for current price and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
  pub id: i64,
  pub name: String,
  pub price: f64,
  pub category: String,
  pub stock: i64,
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCartEntry {
  #[serde(flatten)]
  pub product: CartProduct,
  pub quantity: i64,
}

#[derive(Debug)]
pub struct LocalCart {
  items: Vec<LocalCartEntry>,
  path: PathBuf,
}

impl LocalCart {
  /// Opens the cart persisted under `dir`, starting empty when the file
  /// is absent or unreadable (a corrupt cart resets rather than wedging
  /// the client).
  pub fn open(dir: &Path) -> Self {
    let path = dir.join(STORAGE_KEY);
    let items = match std::fs::read_to_string(&path) {
      Ok(raw) => match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
          warn!(error = %e, "Persisted cart is corrupt, starting empty.");
          Vec::new()
        }
      },
      Err(_) => Vec::new(),
    };
    LocalCart { items, path }
  }

  /// Adds `quantity` units, merging into an existing entry for the same
  /// product id.
  pub fn add(&mut self, product: CartProduct, quantity: i64) {
    match self.items.iter_mut().find(|entry| entry.product.id == product.id) {
      Some(entry) => entry.quantity += quantity,
      None => self.items.push(LocalCartEntry { product, quantity }),
    }
    self.persist();
  }

  pub fn remove(&mut self, product_id: i64) {
    self.items.retain(|entry| entry.product.id != product_id);
    self.persist();
  }

  /// Replaces an entry's quantity. Zero or below removes the entry.
  pub fn set_quantity(&mut self, product_id: i64, quantity: i64) {
    let quantity = quantity.max(0);
    if let Some(entry) = self.items.iter_mut().find(|entry| entry.product.id == product_id) {
      entry.quantity = quantity;
    }
    self.items.retain(|entry| entry.quantity > 0);
    self.persist();
  }

  pub fn clear(&mut self) {
    self.items.clear();
    self.persist();
  }

  pub fn items(&self) -> &[LocalCartEntry] {
    &self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Sum of quantities, recomputed on every call.
  pub fn total_items(&self) -> i64 {
    self.items.iter().map(|entry| entry.quantity).sum()
  }

  /// Sum of price × quantity over the stored snapshots, recomputed on
  /// every call.
  pub fn total_price(&self) -> f64 {
    self.items.iter().map(|entry| entry.product.price * entry.quantity as f64).sum()
  }

  fn persist(&self) {
    let serialized = match serde_json::to_string(&self.items) {
      Ok(s) => s,
      Err(e) => {
        warn!(error = %e, "Failed to serialize cart state.");
        return;
      }
    };
    if let Err(e) = std::fs::write(&self.path, serialized) {
      // The in-memory cart stays usable; only persistence is lost.
      warn!(error = %e, path = %self.path.display(), "Failed to persist cart state.");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(id: i64, price: f64) -> CartProduct {
    CartProduct {
      id,
      name: format!("Producto {}", id),
      price,
      category: "Pinturas".to_string(),
      stock: 50,
      image_url: None,
    }
  }

  #[test]
  fn add_merges_on_existing_product() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = LocalCart::open(dir.path());

    cart.add(product(5, 15.99), 2);
    cart.add(product(5, 15.99), 3);

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 5);
  }

  #[test]
  fn set_quantity_zero_removes_entry() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = LocalCart::open(dir.path());

    cart.add(product(1, 10.0), 2);
    cart.set_quantity(1, 0);
    assert!(cart.is_empty());

    cart.add(product(2, 10.0), 2);
    cart.set_quantity(2, -3);
    assert!(cart.is_empty());
  }

  #[test]
  fn totals_are_computed_from_entries() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = LocalCart::open(dir.path());

    cart.add(product(1, 15.99), 2);
    cart.add(product(2, 8.75), 1);

    assert_eq!(cart.total_items(), 3);
    assert!((cart.total_price() - 40.73).abs() < 1e-9);
  }

  #[test]
  fn cart_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
      let mut cart = LocalCart::open(dir.path());
      cart.add(product(3, 4.25), 4);
    }

    let reopened = LocalCart::open(dir.path());
    assert_eq!(reopened.items().len(), 1);
    assert_eq!(reopened.items()[0].product.id, 3);
    assert_eq!(reopened.total_items(), 4);
  }

  #[test]
  fn corrupt_file_loads_as_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(STORAGE_KEY), "{not json").unwrap();

    let cart = LocalCart::open(dir.path());
    assert!(cart.is_empty());
  }

  #[test]
  fn stored_entries_are_flat_product_objects() {
    // The persisted shape is the product snapshot with a quantity field
    // spliced in, matching what the storefront has always written.
    let entry = LocalCartEntry {
      product: product(9, 12.0),
      quantity: 2,
    };
    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["id"], 9);
    assert_eq!(value["quantity"], 2);
    assert!(value.get("product").is_none());
  }
}
