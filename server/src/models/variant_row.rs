// src/models/variant_row.rs

use orderbot::ProductVariant;
use sqlx::FromRow;

pub const VARIANT_COLUMNS: &str =
  "id, product_name, variant_name, variant_type, unit_price_cents, currency, stock_quantity, is_available, description";

#[derive(Debug, Clone, FromRow)]
pub struct VariantRow {
  pub id: String,
  pub product_name: String,
  pub variant_name: String,
  pub variant_type: Option<String>,
  pub unit_price_cents: i64,
  pub currency: String,
  pub stock_quantity: i32,
  pub is_available: bool,
  pub description: Option<String>,
}

impl From<VariantRow> for ProductVariant {
  fn from(row: VariantRow) -> Self {
    ProductVariant {
      id: row.id,
      product_name: row.product_name,
      variant_name: row.variant_name,
      variant_type: row.variant_type,
      unit_price_cents: row.unit_price_cents,
      currency: row.currency,
      stock_quantity: row.stock_quantity,
      is_available: row.is_available,
      description: row.description,
    }
  }
}
