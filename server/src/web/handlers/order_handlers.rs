// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use orderbot::{format_money, Order, OrderRequest, OrderStatus, SearchParams};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::{json_or_default, non_blank, parse_date};
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::envelope;

/// Order plus its human-readable status.
fn order_view(order: &Order) -> serde_json::Value {
  json!({
    "order_id": order.id,
    "customer_name": order.customer_name,
    "phone_number": order.phone_number,
    "item": order.item,
    "variant_id": order.variant_id,
    "variant_name": order.variant_name,
    "quantity": order.quantity,
    "delivery_address": order.delivery_address,
    "order_status": order.status,
    "status_message": order.status_message(),
    "created_at": order.created_at,
    "updated_at": order.updated_at,
  })
}

fn pricing_view(order: &Order) -> serde_json::Value {
  json!({
    "order_id": order.id,
    "customer_name": order.customer_name,
    "phone_number": order.phone_number,
    "item": order.item,
    "variant_id": order.variant_id,
    "variant_name": order.variant_name,
    "quantity": order.quantity,
    "unit_price_cents": order.unit_price_cents,
    "currency": order.currency,
    "total_price_cents": order.total_price_cents,
    "unit_price": format_money(order.unit_price_cents, &order.currency),
    "total_price": format_money(order.total_price_cents, &order.currency),
    "delivery_address": order.delivery_address,
    "order_status": order.status,
    "stock_reserved": order.stock_reserved,
    "created_at": order.created_at,
    "updated_at": order.updated_at,
  })
}

fn order_list(orders: &[Order]) -> Vec<serde_json::Value> {
  orders.iter().map(order_view).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct TestOrderBody {
  pub customer_name: Option<String>,
  pub phone_number: Option<String>,
  pub item: Option<String>,
  pub quantity: Option<i32>,
  pub delivery_address: Option<String>,
  pub unit_price_cents: Option<i64>,
}

/// Free-form order with defaults for every missing field.
#[instrument(name = "handler::create_test_order", skip(app_state, raw), fields(body_bytes = raw.len()))]
pub async fn create_test_order_handler(
  app_state: web::Data<AppState>,
  raw: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let body: TestOrderBody = json_or_default(&raw)?;
  let request = OrderRequest {
    customer_name: non_blank(&body.customer_name).unwrap_or("Test Customer").to_string(),
    phone_number: non_blank(&body.phone_number).unwrap_or("254712345678").to_string(),
    item: Some(non_blank(&body.item).unwrap_or("Pizza").to_string()),
    quantity: body.quantity.unwrap_or(1),
    delivery_address: non_blank(&body.delivery_address).unwrap_or("123 Test Street").to_string(),
    unit_price_cents: body.unit_price_cents,
    ..Default::default()
  };

  let order = app_state.bot.orders.place_order(request).await?;
  info!(order_id = %order.id, "Test order created.");
  Ok(envelope::success(
    format!("Order {} created successfully!", order.id),
    json!({ "order_id": order.id, "data": pricing_view(&order) }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderBody {
  pub customer_name: Option<String>,
  pub phone_number: Option<String>,
  pub variant_id: Option<String>,
  pub quantity: Option<i32>,
  pub delivery_address: Option<String>,
}

/// Order for a catalog variant; prices come from the variant and stock is reserved.
#[instrument(name = "handler::create_order", skip(app_state, body))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  body: web::Json<CreateOrderBody>,
) -> Result<HttpResponse, AppError> {
  let body = body.into_inner();
  let missing = || {
    AppError::Validation(
      "All fields (customer_name, phone_number, variant_id, quantity, delivery_address) are required.".to_string(),
    )
  };
  let request = OrderRequest {
    customer_name: non_blank(&body.customer_name).ok_or_else(missing)?.to_string(),
    phone_number: non_blank(&body.phone_number).ok_or_else(missing)?.to_string(),
    variant_id: Some(non_blank(&body.variant_id).ok_or_else(missing)?.to_string()),
    quantity: body.quantity.ok_or_else(missing)?,
    delivery_address: non_blank(&body.delivery_address).ok_or_else(missing)?.to_string(),
    ..Default::default()
  };

  let order = app_state.bot.orders.place_order(request).await?;
  Ok(envelope::created(
    format!("Order {} created successfully with variant {}.", order.id, order.variant_name.as_deref().unwrap_or("")),
    json!({ "order_id": order.id, "order_details": pricing_view(&order) }),
  ))
}

#[instrument(name = "handler::get_order_status", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.bot.reports.order_status(&path.into_inner()).await?;
  Ok(envelope::success("Order fetched successfully.", json!({ "order": order_view(&order) })))
}

#[instrument(name = "handler::get_order_pricing", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_pricing_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.bot.orders.get_order(&path.into_inner()).await?;
  Ok(envelope::success(
    "Order pricing fetched successfully.",
    json!({ "order_details": pricing_view(&order) }),
  ))
}

#[instrument(name = "handler::get_order_products", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.bot.reports.order_products(&path.into_inner()).await?;
  Ok(envelope::success(
    "Order products fetched successfully.",
    json!({
      "order_id": products.order.id,
      "customer_name": products.order.customer_name,
      "order_status": products.order.status,
      "products": products.products,
      "total_items": products.total_items,
      "total_quantity": products.total_quantity,
    }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
  pub new_status: Option<String>,
  pub notes: Option<String>,
}

#[instrument(name = "handler::update_order_status", skip(app_state, path, body), fields(order_id = %path.as_ref()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  body: web::Json<UpdateStatusBody>,
) -> Result<HttpResponse, AppError> {
  let body = body.into_inner();
  let new_status = non_blank(&body.new_status)
    .ok_or_else(|| AppError::Validation("Please provide new_status".to_string()))?
    .to_string();
  let notes = non_blank(&body.notes).map(str::to_string);

  let change = app_state
    .bot
    .orders
    .update_status(&path.into_inner(), &new_status, notes)
    .await?;
  Ok(envelope::success(
    format!(
      "Order {} status updated from {} to {}",
      change.order.id, change.old_status, change.order.status
    ),
    json!({
      "order_id": change.order.id,
      "old_status": change.old_status,
      "new_status": change.order.status,
    }),
  ))
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelBody {
  pub reason: Option<String>,
}

#[instrument(name = "handler::cancel_order", skip(app_state, path, raw), fields(order_id = %path.as_ref()))]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  raw: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let body: CancelBody = json_or_default(&raw)?;
  let reason = body.reason.filter(|r| !r.trim().is_empty());
  let change = app_state.bot.orders.cancel_order(&path.into_inner(), reason).await?;
  Ok(envelope::success(
    format!("Order {} has been cancelled", change.order.id),
    json!({
      "order_id": change.order.id,
      "old_status": change.old_status,
      "new_status": change.order.status,
    }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct CustomerOrdersQuery {
  pub phone_number: Option<String>,
  pub customer_name: Option<String>,
}

#[instrument(name = "handler::customer_orders", skip(app_state, query))]
pub async fn customer_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<CustomerOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .bot
    .reports
    .customer_orders(non_blank(&query.phone_number), non_blank(&query.customer_name))
    .await?;
  Ok(envelope::success(
    format!("Found {} orders", orders.len()),
    json!({ "total_orders": orders.len(), "orders": order_list(&orders) }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
  pub phone_number: Option<String>,
  pub limit: Option<usize>,
}

#[instrument(name = "handler::order_history", skip(app_state, query))]
pub async fn order_history_handler(
  app_state: web::Data<AppState>,
  query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
  let phone_number =
    non_blank(&query.phone_number).ok_or_else(|| AppError::Validation("Please provide phone_number".to_string()))?;
  let orders = app_state.bot.reports.order_history(phone_number, query.limit).await?;
  Ok(envelope::success(
    format!("Found {} orders", orders.len()),
    json!({ "phone_number": phone_number, "total_orders": orders.len(), "orders": order_list(&orders) }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
  pub query: Option<String>,
  pub status: Option<String>,
  pub date_from: Option<String>,
  pub date_to: Option<String>,
}

#[instrument(name = "handler::search_orders", skip(app_state, query))]
pub async fn search_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
  let status = non_blank(&query.status)
    .map(|raw| raw.parse::<OrderStatus>())
    .transpose()?;
  let params = SearchParams {
    text: non_blank(&query.query).map(str::to_string),
    status,
    date_from: parse_date("date_from", &query.date_from)?,
    date_to: parse_date("date_to", &query.date_to)?,
  };
  let orders = app_state.bot.reports.search_orders(&params).await?;
  Ok(envelope::success(
    format!("Found {} orders", orders.len()),
    json!({ "total_found": orders.len(), "orders": order_list(&orders) }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct ByDateQuery {
  pub date: Option<String>,
  pub date_from: Option<String>,
  pub date_to: Option<String>,
}

#[instrument(name = "handler::orders_by_date", skip(app_state, query))]
pub async fn orders_by_date_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ByDateQuery>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .bot
    .reports
    .orders_by_date(
      parse_date("date", &query.date)?,
      parse_date("date_from", &query.date_from)?,
      parse_date("date_to", &query.date_to)?,
    )
    .await?;
  Ok(envelope::success(
    format!("Found {} orders", orders.len()),
    json!({ "total_orders": orders.len(), "orders": order_list(&orders) }),
  ))
}
