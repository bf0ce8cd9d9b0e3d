// server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{auth_handlers, cart_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({
    "status": "OK",
    "message": "Tienda Virtual API funcionando",
    "version": env!("CARGO_PKG_VERSION"),
    "timestamp": chrono::Utc::now().to_rfc3339(),
  }))
}

// This function is called in `main.rs` (and by the HTTP tests) to configure
// services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/profile", web::get().to(auth_handlers::profile_handler))
          .route("/verify", web::post().to(auth_handlers::verify_handler))
          .route("/refresh", web::post().to(auth_handlers::refresh_handler))
          .route("/status", web::get().to(auth_handlers::status_handler)),
      )
      // Product Routes. The specific paths are registered before the
      // `/{id}` catch-all so "search" never parses as a product id.
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/search", web::get().to(product_handlers::search_products_handler))
          .route("/filter", web::get().to(product_handlers::filter_products_handler))
          .route("/categories", web::get().to(product_handlers::categories_handler))
          .route("/price-range", web::get().to(product_handlers::price_range_handler))
          .route("/{id}", web::get().to(product_handlers::get_product_handler)),
      )
      // Cart Routes. Every handler takes the AuthenticatedUser extractor,
      // so the whole scope is bearer-protected.
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/update/{cart_item_id}", web::put().to(cart_handlers::update_cart_item_handler))
          .route("/remove/{cart_item_id}", web::delete().to(cart_handlers::remove_cart_item_handler))
          .route("/clear", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/summary", web::get().to(cart_handlers::cart_summary_handler))
          .route("/validate", web::post().to(cart_handlers::validate_cart_handler)),
      ),
  );
}
