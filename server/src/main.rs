// src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use orderbot::{MemoryStore, SharedMessenger, SharedStore};
use orderbot_server::config::AppConfig;
use orderbot_server::db::{self, PgStore};
use orderbot_server::services::WhatsAppClient;
use orderbot_server::state::AppState;
use orderbot_server::{seed, web};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting order bot server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let store: SharedStore = match &app_config.database_url {
    Some(database_url) => match db::connect_and_migrate(database_url).await {
      Ok(pool) => Arc::new(PgStore::new(pool)),
      Err(e) => {
        tracing::error!(error = %e, "Failed to prepare the database.");
        return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
      }
    },
    None => {
      tracing::warn!("DATABASE_URL not set; using the in-memory record store.");
      Arc::new(MemoryStore::new())
    }
  };

  if app_config.seed_db {
    if let Err(e) = seed::seed_sample_variants(store.as_ref(), &app_config.default_currency).await {
      tracing::error!(error = %e, "Failed to seed sample variants.");
    }
  }

  let messenger: SharedMessenger = match WhatsAppClient::new(app_config.whatsapp.clone()) {
    Ok(client) => Arc::new(client),
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the WhatsApp HTTP client.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let app_state = AppState::new(store, messenger, app_config.clone());

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
