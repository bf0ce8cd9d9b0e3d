// server/src/main.rs

use actix_cors::Cors;
use actix_web::{http, web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use tienda_server::config::AppConfig;
use tienda_server::state::AppState;
use tienda_server::{db, web};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting Tienda Virtual API server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize Database Pool
  let db_pool = match db::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  // Bootstrap schema, and seed the sample catalog if configured
  if let Err(e) = db::init_schema(&db_pool).await {
    tracing::error!(error = %e, "Failed to initialize database schema.");
    panic!("Database schema error: {}", e);
  }
  if app_config.seed_db {
    if let Err(e) = db::seed_products(&db_pool).await {
      tracing::error!(error = %e, "Failed to seed sample products.");
    }
  }

  // Create AppState
  let app_state = AppState {
    db_pool: db_pool.clone(),
    config: app_config.clone(),
  };

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  let cors_origin = app_config.cors_origin.clone();

  HttpServer::new(move || {
    let cors = Cors::default()
      .allowed_origin(&cors_origin)
      .allowed_methods(["GET", "POST", "PUT", "DELETE"])
      .allowed_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
      .supports_credentials();

    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .app_data(actix_data::JsonConfig::default().error_handler(web::json_error_handler))
      .wrap(cors)
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
