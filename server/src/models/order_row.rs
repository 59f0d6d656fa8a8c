// src/models/order_row.rs

use chrono::{DateTime, Utc};
use orderbot::{BotError, Order, OrderComment, OrderStatus};
use sqlx::FromRow;
use uuid::Uuid;

pub const ORDER_COLUMNS: &str = "id, customer_name, phone_number, item, variant_id, variant_name, quantity, \
   unit_price_cents, currency, total_price_cents, delivery_address, status, stock_reserved, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
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
  pub status: String,
  pub stock_reserved: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = BotError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    let status: OrderStatus = row
      .status
      .parse()
      .map_err(|_| BotError::Internal(format!("Unknown order status '{}' for {}", row.status, row.id)))?;
    Ok(Order {
      id: row.id,
      customer_name: row.customer_name,
      phone_number: row.phone_number,
      item: row.item,
      variant_id: row.variant_id,
      variant_name: row.variant_name,
      quantity: row.quantity,
      unit_price_cents: row.unit_price_cents,
      currency: row.currency,
      total_price_cents: row.total_price_cents,
      delivery_address: row.delivery_address,
      status,
      stock_reserved: row.stock_reserved,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
  pub id: Uuid,
  pub order_id: String,
  pub body: String,
  pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for OrderComment {
  fn from(row: CommentRow) -> Self {
    OrderComment {
      id: row.id,
      order_id: row.order_id,
      body: row.body,
      created_at: row.created_at,
    }
  }
}
