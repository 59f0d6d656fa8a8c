// src/models/session_row.rs

use chrono::{DateTime, Utc};
use orderbot::{BotError, Session, SessionStatus, SessionStep};
use sqlx::FromRow;
use uuid::Uuid;

pub const SESSION_COLUMNS: &str = "id, phone_number, status, current_step, selected_variant_id, item_name, \
   unit_price_cents, currency, quantity, delivery_address, order_id, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
  pub id: Uuid,
  pub phone_number: String,
  pub status: String,
  pub current_step: String,
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

impl TryFrom<SessionRow> for Session {
  type Error = BotError;

  fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
    let status = SessionStatus::parse(&row.status)
      .ok_or_else(|| BotError::Internal(format!("Unknown session status '{}' for {}", row.status, row.id)))?;
    let step = SessionStep::parse(&row.current_step)
      .ok_or_else(|| BotError::Internal(format!("Unknown session step '{}' for {}", row.current_step, row.id)))?;
    Ok(Session {
      id: row.id,
      phone_number: row.phone_number,
      status,
      step,
      selected_variant_id: row.selected_variant_id,
      item_name: row.item_name,
      unit_price_cents: row.unit_price_cents,
      currency: row.currency,
      quantity: row.quantity,
      delivery_address: row.delivery_address,
      order_id: row.order_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}
