// core/src/models/order.rs

use crate::error::{BotError, BotResult};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Preparing,
  #[serde(rename = "Out for Delivery")]
  OutForDelivery,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "Pending",
      OrderStatus::Confirmed => "Confirmed",
      OrderStatus::Preparing => "Preparing",
      OrderStatus::OutForDelivery => "Out for Delivery",
      OrderStatus::Delivered => "Delivered",
      OrderStatus::Cancelled => "Cancelled",
    }
  }

  /// Delivered and Cancelled orders can no longer be modified.
  pub fn is_terminal(self) -> bool {
    matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
  }

  /// Customer-facing description of the status.
  pub fn message(self) -> &'static str {
    match self {
      OrderStatus::Pending => "Your order is being processed",
      OrderStatus::Confirmed => "Order confirmed! We're preparing your order",
      OrderStatus::Preparing => "Your order is being prepared",
      OrderStatus::OutForDelivery => "Your order is on its way!",
      OrderStatus::Delivered => "Order delivered successfully!",
      OrderStatus::Cancelled => "Order has been cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = BotError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| {
        BotError::Validation(format!(
          "Invalid status: {}. Valid statuses: {}",
          s,
          OrderStatus::ALL.map(OrderStatus::as_str).join(", ")
        ))
      })
  }
}

/// Status message for a raw status string, falling back for values outside the enum.
pub fn status_message(raw_status: &str) -> &'static str {
  raw_status
    .parse::<OrderStatus>()
    .map(OrderStatus::message)
    .unwrap_or("Unknown status")
}

/// Formats an order number as `WOR-YYYY-NNNNN`.
pub fn format_order_id(created_at: DateTime<Utc>, sequence: u64) -> String {
  format!("WOR-{}-{:05}", created_at.year(), sequence)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub id: String,
  pub customer_name: String,
  pub phone_number: String,
  pub item: String,
  pub variant_id: Option<String>,
  pub variant_name: Option<String>,
  pub quantity: i32,
  pub unit_price_cents: i64,
  pub currency: String,
  pub total_price_cents: i64,
  pub delivery_address: String,
  pub status: OrderStatus,
  /// Set when this order holds a decrement of the variant's stock.
  pub stock_reserved: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  /// Builds the stored order from a validated request and its assigned number.
  pub fn from_new(id: String, new_order: NewOrder, stock_reserved: bool) -> Self {
    let total_price_cents = new_order.total_price_cents();
    Self {
      id,
      customer_name: new_order.customer_name,
      phone_number: new_order.phone_number,
      item: new_order.item,
      variant_id: new_order.variant_id,
      variant_name: new_order.variant_name,
      quantity: new_order.quantity,
      unit_price_cents: new_order.unit_price_cents,
      currency: new_order.currency,
      total_price_cents,
      delivery_address: new_order.delivery_address,
      status: OrderStatus::Pending,
      stock_reserved,
      created_at: new_order.created_at,
      updated_at: new_order.created_at,
    }
  }

  fn ensure_open(&self) -> BotResult<()> {
    if self.status.is_terminal() {
      return Err(BotError::OrderClosed {
        order_id: self.id.clone(),
        status: self.status.to_string(),
      });
    }
    Ok(())
  }

  /// Delivered and cancelled orders are immutable.
  pub fn set_quantity(&mut self, quantity: i32) -> BotResult<()> {
    self.ensure_open()?;
    if quantity <= 0 {
      return Err(BotError::Validation("Quantity must be greater than 0".to_string()));
    }
    self.quantity = quantity;
    self.recompute_total();
    Ok(())
  }

  pub fn set_unit_price(&mut self, unit_price_cents: i64) -> BotResult<()> {
    self.ensure_open()?;
    if unit_price_cents < 0 {
      return Err(BotError::Validation("Unit Price must be a non-negative number.".to_string()));
    }
    self.unit_price_cents = unit_price_cents;
    self.recompute_total();
    Ok(())
  }

  fn recompute_total(&mut self) {
    self.total_price_cents = i64::from(self.quantity) * self.unit_price_cents;
  }

  pub fn status_message(&self) -> &'static str {
    self.status.message()
  }
}

/// A validated, priced order request ready to be written by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub customer_name: String,
  pub phone_number: String,
  pub item: String,
  pub variant_id: Option<String>,
  pub variant_name: Option<String>,
  pub quantity: i32,
  pub unit_price_cents: i64,
  pub currency: String,
  pub delivery_address: String,
  pub created_at: DateTime<Utc>,
}

impl NewOrder {
  pub fn total_price_cents(&self) -> i64 {
    i64::from(self.quantity) * self.unit_price_cents
  }
}

/// Append-only audit entry attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderComment {
  pub id: Uuid,
  pub order_id: String,
  pub body: String,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn sample_order() -> Order {
    let created_at = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
    Order::from_new(
      format_order_id(created_at, 7),
      NewOrder {
        customer_name: "Jane".to_string(),
        phone_number: "254700000000".to_string(),
        item: "Pizza Margherita".to_string(),
        variant_id: Some("Pizza Margherita - Large".to_string()),
        variant_name: Some("Pizza Margherita - Large".to_string()),
        quantity: 2,
        unit_price_cents: 160_000,
        currency: "KES".to_string(),
        delivery_address: "123 Main Street".to_string(),
        created_at,
      },
      true,
    )
  }

  #[test]
  fn order_number_is_zero_padded_with_year() {
    let order = sample_order();
    assert_eq!(order.id, "WOR-2026-00007");
    assert_eq!(order.status, OrderStatus::Pending);
  }

  #[test]
  fn total_tracks_quantity_and_price_edits() {
    let mut order = sample_order();
    assert_eq!(order.total_price_cents, 320_000);

    order.set_quantity(5).unwrap();
    assert_eq!(order.total_price_cents, 800_000);

    order.set_unit_price(1_050).unwrap();
    assert_eq!(order.total_price_cents, 5 * 1_050);

    assert!(order.set_quantity(0).is_err());
    assert_eq!(order.quantity, 5);

    for closed in [OrderStatus::Delivered, OrderStatus::Cancelled] {
      order.status = closed;
      assert!(matches!(order.set_quantity(2), Err(BotError::OrderClosed { .. })));
      assert!(matches!(order.set_unit_price(10), Err(BotError::OrderClosed { .. })));
      assert_eq!(order.quantity, 5);
      assert_eq!(order.total_price_cents, 5 * 1_050);
    }
  }

  #[test]
  fn parses_statuses_case_insensitively() {
    assert_eq!("out for delivery".parse::<OrderStatus>().unwrap(), OrderStatus::OutForDelivery);
    assert_eq!("Delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
    assert!(matches!("Shipped".parse::<OrderStatus>(), Err(BotError::Validation(_))));
  }

  #[test]
  fn status_messages_fall_back_for_unknown_values() {
    assert_eq!(status_message("Out for Delivery"), "Your order is on its way!");
    assert_eq!(status_message("Lost"), "Unknown status");
  }

  #[test]
  fn serializes_status_with_display_names() {
    let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
    assert_eq!(json, "\"Out for Delivery\"");
  }
}
