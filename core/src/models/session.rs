// core/src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
  Active,
  Completed,
  Cancelled,
}

impl SessionStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      SessionStatus::Active => "active",
      SessionStatus::Completed => "completed",
      SessionStatus::Cancelled => "cancelled",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "active" => Some(SessionStatus::Active),
      "completed" => Some(SessionStatus::Completed),
      "cancelled" => Some(SessionStatus::Cancelled),
      _ => None,
    }
  }
}

/// Where an active conversation currently sits in the ordering flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
  AwaitingCommand,
  AwaitingItem,
  AwaitingQuantity,
  AwaitingAddress,
  AwaitingConfirmation,
}

impl SessionStep {
  pub fn as_str(self) -> &'static str {
    match self {
      SessionStep::AwaitingCommand => "awaiting_command",
      SessionStep::AwaitingItem => "awaiting_item",
      SessionStep::AwaitingQuantity => "awaiting_quantity",
      SessionStep::AwaitingAddress => "awaiting_address",
      SessionStep::AwaitingConfirmation => "awaiting_confirmation",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "awaiting_command" => Some(SessionStep::AwaitingCommand),
      "awaiting_item" => Some(SessionStep::AwaitingItem),
      "awaiting_quantity" => Some(SessionStep::AwaitingQuantity),
      "awaiting_address" => Some(SessionStep::AwaitingAddress),
      "awaiting_confirmation" => Some(SessionStep::AwaitingConfirmation),
      _ => None,
    }
  }
}

/// Per-phone conversation state. At most one `Active` session exists per phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub id: Uuid,
  pub phone_number: String,
  pub status: SessionStatus,
  pub step: SessionStep,
  pub selected_variant_id: Option<String>,
  pub item_name: Option<String>,
  pub unit_price_cents: Option<i64>,
  pub currency: Option<String>,
  pub quantity: Option<i32>,
  pub delivery_address: Option<String>,
  pub order_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Session {
  pub fn new(phone_number: impl Into<String>, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      phone_number: phone_number.into(),
      status: SessionStatus::Active,
      step: SessionStep::AwaitingCommand,
      selected_variant_id: None,
      item_name: None,
      unit_price_cents: None,
      currency: None,
      quantity: None,
      delivery_address: None,
      order_id: None,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn is_active(&self) -> bool {
    self.status == SessionStatus::Active
  }

  /// Drops the item, quantity and address collected so far.
  pub fn clear_selection(&mut self) {
    self.selected_variant_id = None;
    self.item_name = None;
    self.unit_price_cents = None;
    self.currency = None;
    self.quantity = None;
    self.delivery_address = None;
  }

  pub fn total_cents(&self) -> Option<i64> {
    Some(i64::from(self.quantity?) * self.unit_price_cents?)
  }
}
