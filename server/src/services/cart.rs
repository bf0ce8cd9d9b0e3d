// server/src/services/cart.rs

//! Cart consistency logic: every mutation here must leave recorded
//! quantities within current product stock.
//!
//! The stock constraint on add/update is enforced inside a single SQL
//! statement (conditional upsert / conditional update), so two concurrent
//! requests against the same row cannot both pass a stale check and
//! overwrite each other. The preliminary reads below only exist to pick
//! the right error message and response shape.

use crate::errors::{AppError, Result};
use crate::models::{CartItem, CartLine, CartSummary, CartTotals, Product, ValidatedCartItem};
use crate::services::round2;
use sqlx::sqlite::SqlitePool;
use tracing::{info, instrument};

/// What `add_item` did: a fresh row, or a merge into an existing one.
#[derive(Debug, Clone)]
pub enum AddOutcome {
  Created {
    cart_item_id: i64,
    product_name: String,
  },
  Merged {
    product_name: String,
    new_quantity: i64,
  },
}

/// Result of a quantity replacement.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
  pub product_name: String,
  pub quantity: i64,
}

#[instrument(name = "cart::get_cart", skip(pool))]
pub async fn get_cart(pool: &SqlitePool, user_id: i64) -> Result<(Vec<CartLine>, CartSummary)> {
  let items = sqlx::query_as::<_, CartLine>(
    r#"
    SELECT
      ci.id as cart_item_id,
      ci.quantity,
      ci.created_at as added_at,
      p.id as product_id,
      p.name,
      p.description,
      p.price,
      p.category,
      p.stock,
      p.image_url,
      (p.price * ci.quantity) as subtotal
    FROM cart_items ci
    JOIN products p ON ci.product_id = p.id
    WHERE ci.user_id = ?1
    ORDER BY ci.created_at DESC
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let total_items: i64 = items.iter().map(|item| item.quantity).sum();
  let total_amount = round2(items.iter().map(|item| item.subtotal).sum());

  Ok((items, CartSummary { total_items, total_amount }))
}

/// Adds `quantity` units of a product to the caller's cart, merging into
/// an existing row when present.
///
/// The write is one guarded upsert: the INSERT arm only fires while stock
/// covers the requested quantity, and the merge arm only while the merged
/// total stays within stock. A zero-row outcome means some stock
/// constraint lost, and the earlier product read decides which message
/// the caller sees.
#[instrument(name = "cart::add_item", skip(pool))]
pub async fn add_item(pool: &SqlitePool, user_id: i64, product_id: i64, quantity: i64) -> Result<AddOutcome> {
  if product_id <= 0 {
    return Err(AppError::Validation(
      "El ID del producto es requerido y debe ser válido".to_string(),
    ));
  }
  if quantity <= 0 {
    return Err(AppError::Validation(
      "La cantidad debe ser un número entero positivo".to_string(),
    ));
  }

  let product = sqlx::query_as::<_, Product>(
    "SELECT id, name, description, price, category, stock, image_url, created_at FROM products WHERE id = ?1",
  )
  .bind(product_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::NotFound("El producto solicitado no existe".to_string()))?;

  if quantity > product.stock {
    return Err(AppError::InsufficientStock(format!(
      "Solo hay {} unidades disponibles",
      product.stock
    )));
  }

  let upserted: Option<(i64, i64)> = sqlx::query_as(
    r#"
    INSERT INTO cart_items (user_id, product_id, quantity)
    SELECT ?1, ?2, ?3 FROM products WHERE id = ?2 AND stock >= ?3
    ON CONFLICT (user_id, product_id) DO UPDATE
      SET quantity = cart_items.quantity + excluded.quantity
      WHERE cart_items.quantity + excluded.quantity
        <= (SELECT stock FROM products WHERE id = excluded.product_id)
    RETURNING id, quantity
    "#,
  )
  .bind(user_id)
  .bind(product_id)
  .bind(quantity)
  .fetch_optional(pool)
  .await?;

  match upserted {
    // An existing row always merges to more than the requested amount, so
    // equality identifies the fresh-insert arm.
    Some((cart_item_id, new_quantity)) if new_quantity == quantity => {
      info!("Cart item {} created for user {} ({}).", cart_item_id, user_id, product.name);
      Ok(AddOutcome::Created {
        cart_item_id,
        product_name: product.name,
      })
    }
    Some((cart_item_id, new_quantity)) => {
      info!(
        "Cart item {} merged for user {}: {} units of {}.",
        cart_item_id, user_id, new_quantity, product.name
      );
      Ok(AddOutcome::Merged {
        product_name: product.name,
        new_quantity,
      })
    }
    None => {
      let existing = existing_quantity(pool, user_id, product_id).await?;
      match existing {
        Some(held) => {
          let headroom = (product.stock - held).max(0);
          Err(AppError::InsufficientStock(format!(
            "Solo puedes agregar {} unidades más",
            headroom
          )))
        }
        None => Err(AppError::InsufficientStock(format!(
          "Solo hay {} unidades disponibles",
          product.stock
        ))),
      }
    }
  }
}

async fn existing_quantity(pool: &SqlitePool, user_id: i64, product_id: i64) -> Result<Option<i64>> {
  let quantity =
    sqlx::query_scalar::<_, i64>("SELECT quantity FROM cart_items WHERE user_id = ?1 AND product_id = ?2")
      .bind(user_id)
      .bind(product_id)
      .fetch_optional(pool)
      .await?;
  Ok(quantity)
}

/// Replaces (never merges) a cart row's quantity, within current stock.
#[instrument(name = "cart::update_item", skip(pool))]
pub async fn update_item(pool: &SqlitePool, user_id: i64, cart_item_id: i64, quantity: i64) -> Result<UpdateOutcome> {
  if quantity <= 0 {
    return Err(AppError::Validation(
      "La cantidad debe ser un número entero positivo".to_string(),
    ));
  }

  // Ownership is part of the lookup: another user's item is simply not
  // found, never revealed.
  let current: Option<(String, i64)> = sqlx::query_as(
    r#"
    SELECT p.name, p.stock
    FROM cart_items ci
    JOIN products p ON ci.product_id = p.id
    WHERE ci.id = ?1 AND ci.user_id = ?2
    "#,
  )
  .bind(cart_item_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?;

  let (product_name, stock) =
    current.ok_or_else(|| AppError::NotFound("El producto no está en tu carrito".to_string()))?;

  if quantity > stock {
    return Err(AppError::InsufficientStock(format!(
      "Solo hay {} unidades disponibles",
      stock
    )));
  }

  let result = sqlx::query(
    r#"
    UPDATE cart_items SET quantity = ?3
    WHERE id = ?1 AND user_id = ?2
      AND ?3 <= (SELECT stock FROM products WHERE products.id = cart_items.product_id)
    "#,
  )
  .bind(cart_item_id)
  .bind(user_id)
  .bind(quantity)
  .execute(pool)
  .await?;

  if result.rows_affected() == 0 {
    // The row or its stock moved between the read and the write.
    return match sqlx::query_scalar::<_, i64>("SELECT id FROM cart_items WHERE id = ?1 AND user_id = ?2")
      .bind(cart_item_id)
      .bind(user_id)
      .fetch_optional(pool)
      .await?
    {
      None => Err(AppError::NotFound("El producto no está en tu carrito".to_string())),
      Some(_) => Err(AppError::InsufficientStock(format!(
        "Solo hay {} unidades disponibles",
        stock
      ))),
    };
  }

  info!(
    "Cart item {} updated for user {}: {} units of {}.",
    cart_item_id, user_id, quantity, product_name
  );
  Ok(UpdateOutcome { product_name, quantity })
}

/// Removes a cart row the caller owns. Returns the product name for the
/// confirmation message.
#[instrument(name = "cart::remove_item", skip(pool))]
pub async fn remove_item(pool: &SqlitePool, user_id: i64, cart_item_id: i64) -> Result<String> {
  let current: Option<(String,)> = sqlx::query_as(
    r#"
    SELECT p.name
    FROM cart_items ci
    JOIN products p ON ci.product_id = p.id
    WHERE ci.id = ?1 AND ci.user_id = ?2
    "#,
  )
  .bind(cart_item_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?;

  let (product_name,) = current.ok_or_else(|| AppError::NotFound("El producto no está en tu carrito".to_string()))?;

  sqlx::query("DELETE FROM cart_items WHERE id = ?1 AND user_id = ?2")
    .bind(cart_item_id)
    .bind(user_id)
    .execute(pool)
    .await?;

  info!("Cart item {} removed for user {} ({}).", cart_item_id, user_id, product_name);
  Ok(product_name)
}

/// Deletes every cart row of the caller. An already-empty cart reports
/// not-found rather than a zero-count success.
#[instrument(name = "cart::clear_cart", skip(pool))]
pub async fn clear_cart(pool: &SqlitePool, user_id: i64) -> Result<u64> {
  let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
    .bind(user_id)
    .execute(pool)
    .await?;

  let removed = result.rows_affected();
  if removed == 0 {
    return Err(AppError::NotFound("No hay productos en tu carrito".to_string()));
  }

  info!("Cart cleared for user {}: {} rows removed.", user_id, removed);
  Ok(removed)
}

#[instrument(name = "cart::summary", skip(pool))]
pub async fn summary(pool: &SqlitePool, user_id: i64) -> Result<CartTotals> {
  let (total_items, total_quantity, total_amount): (i64, Option<i64>, Option<f64>) = sqlx::query_as(
    r#"
    SELECT COUNT(*), SUM(ci.quantity), SUM(p.price * ci.quantity)
    FROM cart_items ci
    JOIN products p ON ci.product_id = p.id
    WHERE ci.user_id = ?1
    "#,
  )
  .bind(user_id)
  .fetch_one(pool)
  .await?;

  Ok(CartTotals {
    total_items,
    total_quantity: total_quantity.unwrap_or(0),
    total_amount: round2(total_amount.unwrap_or(0.0)),
  })
}

/// Read-only staleness check: flags rows whose recorded quantity no longer
/// fits current stock. Nothing is mutated; checkout flows run this before
/// committing to a purchase.
#[instrument(name = "cart::validate", skip(pool))]
pub async fn validate(pool: &SqlitePool, user_id: i64) -> Result<(Vec<ValidatedCartItem>, Vec<ValidatedCartItem>, bool)> {
  let items = sqlx::query_as::<_, ValidatedCartItem>(
    r#"
    SELECT
      ci.id as cart_item_id,
      ci.quantity,
      p.id as product_id,
      p.name,
      p.price,
      p.stock,
      CASE
        WHEN ci.quantity > p.stock THEN 'insufficient_stock'
        ELSE 'valid'
      END as status
    FROM cart_items ci
    JOIN products p ON ci.product_id = p.id
    WHERE ci.user_id = ?1
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let invalid: Vec<ValidatedCartItem> = items.iter().filter(|item| item.status != "valid").cloned().collect();
  let is_valid = invalid.is_empty();

  Ok((items, invalid, is_valid))
}

/// Needed by tests and the merge edge: a row the caller holds for a
/// product, if any.
#[instrument(name = "cart::find_item", skip(pool))]
pub async fn find_item(pool: &SqlitePool, user_id: i64, product_id: i64) -> Result<Option<CartItem>> {
  let item = sqlx::query_as::<_, CartItem>(
    "SELECT id, user_id, product_id, quantity, created_at FROM cart_items WHERE user_id = ?1 AND product_id = ?2",
  )
  .bind(user_id)
  .bind(product_id)
  .fetch_optional(pool)
  .await?;
  Ok(item)
}
