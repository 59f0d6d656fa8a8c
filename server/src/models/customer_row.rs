// src/models/customer_row.rs

use chrono::{DateTime, Utc};
use orderbot::Customer;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
  pub id: Uuid,
  pub name: String,
  pub phone_number: String,
  pub address: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
  fn from(row: CustomerRow) -> Self {
    Customer {
      id: row.id,
      name: row.name,
      phone_number: row.phone_number,
      address: row.address,
      created_at: row.created_at,
    }
  }
}
