// server/src/lib.rs

//! Backend of the Tienda Virtual storefront: catalog queries, per-user
//! carts with stock validation, and token-based authentication over a
//! single SQLite store.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
