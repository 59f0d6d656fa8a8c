// core/src/orders/mod.rs

//! Order lifecycle: placement, status updates and cancellation.
//!
//! Placement and status changes each run as a `Pipeline`; the manager builds
//! both once and reuses them for every call.

pub mod place;
pub mod status;

pub use place::{build_place_pipeline, OrderRequest, PlaceOrderContext};
pub use status::{build_status_pipeline, status_notification, ChangeKind, StatusChangeContext, DEFAULT_CANCEL_REASON};

use crate::conversation::PlaceOrder;
use crate::error::{BotError, BotResult};
use crate::messaging::SharedMessenger;
use crate::models::{Order, OrderComment, OrderStatus};
use crate::pipeline::{ContextData, Pipeline};
use crate::store::SharedStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Result of a status update or cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
  pub order: Order,
  pub old_status: OrderStatus,
}

#[derive(Clone)]
pub struct OrderManager {
  store: SharedStore,
  default_currency: String,
  place_pipeline: Arc<Pipeline<PlaceOrderContext>>,
  status_pipeline: Arc<Pipeline<StatusChangeContext>>,
}

impl OrderManager {
  pub fn new(store: SharedStore, messenger: SharedMessenger, default_currency: impl Into<String>) -> Self {
    Self {
      place_pipeline: Arc::new(place::build_place_pipeline(store.clone())),
      status_pipeline: Arc::new(status::build_status_pipeline(store.clone(), messenger)),
      store,
      default_currency: default_currency.into(),
    }
  }

  /// Validates, prices and writes a new order. Variant orders reserve stock.
  #[instrument(
    name = "OrderManager::place_order",
    skip(self, request),
    fields(phone_number = %request.phone_number, variant_id = ?request.variant_id, quantity = request.quantity),
    err(Display)
  )]
  pub async fn place_order(&self, request: OrderRequest) -> BotResult<Order> {
    let ctx = ContextData::new(PlaceOrderContext {
      request,
      default_currency: self.default_currency.clone(),
      ..Default::default()
    });
    self.place_pipeline.run(ctx.clone()).await?;
    let order = ctx.write().order.take();
    order.ok_or_else(|| BotError::Internal("Order placement finished without an order".to_string()))
  }

  /// Places the order a chat conversation collected.
  pub async fn place_from_conversation(&self, action: &PlaceOrder, at: DateTime<Utc>) -> BotResult<Order> {
    self
      .place_order(OrderRequest {
        customer_name: format!("WhatsApp Customer {}", action.phone_number),
        phone_number: action.phone_number.clone(),
        delivery_address: action.delivery_address.clone(),
        variant_id: Some(action.variant_id.clone()),
        item: Some(action.item_name.clone()),
        quantity: action.quantity,
        unit_price_cents: Some(action.unit_price_cents),
        currency: Some(action.currency.clone()),
        created_at: Some(at),
      })
      .await
  }

  pub async fn get_order(&self, order_id: &str) -> BotResult<Order> {
    self
      .store
      .get_order(order_id)
      .await?
      .ok_or_else(|| BotError::NotFound(format!("Order {} not found", order_id)))
  }

  pub async fn comments(&self, order_id: &str) -> BotResult<Vec<OrderComment>> {
    self.get_order(order_id).await?;
    self.store.order_comments(order_id).await
  }

  /// Moves the order to `new_status` and notifies the customer (best effort).
  #[instrument(name = "OrderManager::update_status", skip(self, notes), err(Display))]
  pub async fn update_status(&self, order_id: &str, new_status: &str, notes: Option<String>) -> BotResult<StatusChange> {
    let new_status: OrderStatus = new_status.parse()?;
    let ctx = StatusChangeContext::new(order_id, new_status, ChangeKind::Update { notes }, true);
    self.change_status(ctx).await
  }

  #[instrument(name = "OrderManager::cancel_order", skip(self, reason), err(Display))]
  pub async fn cancel_order(&self, order_id: &str, reason: Option<String>) -> BotResult<StatusChange> {
    let reason = reason
      .map(|r| r.trim().to_string())
      .filter(|r| !r.is_empty())
      .unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string());
    let ctx = StatusChangeContext::new(order_id, OrderStatus::Cancelled, ChangeKind::Cancel { reason }, false);
    self.change_status(ctx).await
  }

  async fn change_status(&self, ctx: StatusChangeContext) -> BotResult<StatusChange> {
    let ctx = ContextData::new(ctx);
    self.status_pipeline.run(ctx.clone()).await?;
    let mut guard = ctx.write();
    match (guard.current.take(), guard.updated.take()) {
      (Some(previous), Some(order)) => Ok(StatusChange {
        order,
        old_status: previous.status,
      }),
      _ => Err(BotError::Internal("Status change finished without an updated order".to_string())),
    }
  }
}
