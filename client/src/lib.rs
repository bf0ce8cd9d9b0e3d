// client/src/lib.rs

//! Non-UI core of the Tienda Virtual storefront client: a typed HTTP
//! client for the backend API and the local cart mirror persisted across
//! sessions.
//!
//! The local cart and the server-side cart are deliberately independent
//! aggregates (offline-cart behavior); `ApiClient::push_to_server` is the
//! one explicit sync point between them.

pub mod api;
pub mod local_cart;

pub use api::{ApiClient, ClientError};
pub use local_cart::{CartProduct, LocalCart, LocalCartEntry};
