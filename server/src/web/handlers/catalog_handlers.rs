// src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use orderbot::catalog::menu_lines;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::non_blank;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::envelope;

/// The numbered menu a chat customer would see.
#[instrument(name = "handler::chat_menu", skip(app_state))]
pub async fn chat_menu_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let items = app_state.bot.catalog.chat_menu().await?;
  Ok(envelope::success(
    format!("{} items available", items.len()),
    json!({ "menu_text": menu_lines(&items), "items": items }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct VariantsQuery {
  pub product_name: Option<String>,
}

#[instrument(name = "handler::list_variants", skip(app_state, query))]
pub async fn list_variants_handler(
  app_state: web::Data<AppState>,
  query: web::Query<VariantsQuery>,
) -> Result<HttpResponse, AppError> {
  let variants = app_state
    .bot
    .catalog
    .list_variants(non_blank(&query.product_name))
    .await?;
  Ok(envelope::success(
    format!("Found {} variants", variants.len()),
    json!({ "variants": variants }),
  ))
}

#[instrument(name = "handler::variant_details", skip(app_state, path), fields(variant_id = %path.as_ref()))]
pub async fn variant_details_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let variant = app_state.bot.catalog.variant_details(&path.into_inner()).await?;
  Ok(envelope::success("Variant fetched successfully.", json!({ "variant": variant })))
}

#[instrument(name = "handler::products_menu", skip(app_state))]
pub async fn products_menu_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let menu = app_state.bot.catalog.products_menu().await?;
  Ok(envelope::success(
    format!("{} products available", menu.products.len()),
    json!({ "products": menu.products, "formatted_menu": menu.formatted_menu }),
  ))
}
