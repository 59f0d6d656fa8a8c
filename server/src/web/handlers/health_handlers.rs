// src/web/handlers/health_handlers.rs

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::envelope;
use actix_web::{web, HttpResponse};
use orderbot::VariantFilter;
use serde_json::json;

/// Touches the record store so a dead database shows up as a 500.
pub async fn health_check_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  app_state.bot.store.list_variants(&VariantFilter::default()).await?;
  Ok(envelope::success(
    "ok",
    json!({ "database": app_state.config.database_url.is_some() }),
  ))
}
