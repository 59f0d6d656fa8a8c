// core/src/orders/status.rs

//! Status change pipeline shared by status updates and cancellations:
//! `load_order` -> `guard_transition` -> `apply_transition` -> `notify_customer`.

use crate::error::BotError;
use crate::messaging::SharedMessenger;
use crate::models::{Order, OrderStatus};
use crate::pipeline::{ContextData, Pipeline, PipelineControl, SkipCondition};
use crate::store::{OrderTransition, SharedStore, StockEffect};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_CANCEL_REASON: &str = "Customer requested cancellation";

#[derive(Debug, Clone)]
pub enum ChangeKind {
  Update { notes: Option<String> },
  Cancel { reason: String },
}

#[derive(Debug)]
pub struct StatusChangeContext {
  pub order_id: String,
  pub new_status: OrderStatus,
  pub kind: ChangeKind,
  pub notify: bool,
  pub at: DateTime<Utc>,
  pub current: Option<Order>,
  pub updated: Option<Order>,
}

impl StatusChangeContext {
  pub fn new(order_id: &str, new_status: OrderStatus, kind: ChangeKind, notify: bool) -> Self {
    Self {
      order_id: order_id.to_string(),
      new_status,
      kind,
      notify,
      at: Utc::now(),
      current: None,
      updated: None,
    }
  }

  fn audit_comment(&self, old_status: OrderStatus) -> String {
    match &self.kind {
      ChangeKind::Cancel { reason } => format!("Order cancelled. Reason: {}", reason),
      ChangeKind::Update { notes: Some(notes) } if !notes.trim().is_empty() => format!(
        "Status changed from {} to {}. Notes: {}",
        old_status,
        self.new_status,
        notes.trim()
      ),
      ChangeKind::Update { .. } => format!("Status changed from {} to {}", old_status, self.new_status),
    }
  }
}

/// Stock follows the status: confirming takes stock if not yet held, cancelling gives it back.
pub fn stock_effect_for(new_status: OrderStatus) -> StockEffect {
  match new_status {
    OrderStatus::Confirmed => StockEffect::Reserve,
    OrderStatus::Cancelled => StockEffect::Release,
    _ => StockEffect::None,
  }
}

pub fn status_notification(order: &Order) -> String {
  format!(
    "📱 Order Update\n\nOrder: {}\nStatus: {}\nMessage: {}\n\nThank you for choosing us! 🎉",
    order.id,
    order.status,
    order.status_message()
  )
}

pub fn build_status_pipeline(store: SharedStore, messenger: SharedMessenger) -> Pipeline<StatusChangeContext> {
  let quiet: SkipCondition<StatusChangeContext> = Arc::new(|ctx: ContextData<StatusChangeContext>| !ctx.read().notify);

  let mut pipeline = Pipeline::new(
    "change_order_status",
    &[
      ("load_order", false, None),
      ("guard_transition", false, None),
      ("apply_transition", false, None),
      ("notify_customer", true, Some(quiet)),
    ],
  );

  let load_store = store.clone();
  pipeline.on_root("load_order", move |ctx: ContextData<StatusChangeContext>| {
    let store = load_store.clone();
    async move {
      let order_id = ctx.read().order_id.clone();
      let order = store
        .get_order(&order_id)
        .await?
        .ok_or_else(|| BotError::NotFound(format!("Order {} not found", order_id)))?;
      ctx.write().current = Some(order);
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  pipeline.on_root("guard_transition", |ctx: ContextData<StatusChangeContext>| async move {
    let guard = ctx.read();
    let current = guard
      .current
      .as_ref()
      .ok_or_else(|| BotError::Internal("Order not loaded before guard".to_string()))?;
    if current.status.is_terminal() {
      return Err(BotError::OrderClosed {
        order_id: current.id.clone(),
        status: current.status.to_string(),
      });
    }
    Ok::<_, BotError>(PipelineControl::Continue)
  });

  let apply_store = store;
  pipeline.on_root("apply_transition", move |ctx: ContextData<StatusChangeContext>| {
    let store = apply_store.clone();
    async move {
      let transition = {
        let guard = ctx.read();
        let current = guard
          .current
          .as_ref()
          .ok_or_else(|| BotError::Internal("Order not loaded before apply".to_string()))?;
        OrderTransition {
          order_id: current.id.clone(),
          expected_status: current.status,
          new_status: guard.new_status,
          stock_effect: stock_effect_for(guard.new_status),
          comment: guard.audit_comment(current.status),
          at: guard.at,
        }
      };
      let old_status = transition.expected_status;
      let updated = store.transition_order(transition).await?;
      info!(
        order_id = %updated.id,
        old_status = %old_status,
        new_status = %updated.status,
        stock_reserved = updated.stock_reserved,
        "Order status changed."
      );
      ctx.write().updated = Some(updated);
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  pipeline.on_root("notify_customer", move |ctx: ContextData<StatusChangeContext>| {
    let messenger = messenger.clone();
    async move {
      let Some(order) = ctx.read().updated.clone() else {
        return Ok::<_, BotError>(PipelineControl::Continue);
      };
      if let Err(e) = messenger.send_text(&order.phone_number, &status_notification(&order)).await {
        warn!(order_id = %order.id, error = %e, "Status notification not delivered.");
      }
      Ok(PipelineControl::Continue)
    }
  });

  pipeline
}
