// core/src/models/variant.rs

use crate::error::{BotError, BotResult};
use serde::{Deserialize, Serialize};

/// A purchasable configuration of a product (e.g. a size) with its own price and stock.
///
/// The `id` is the human-readable variant name, e.g. `"Pizza Margherita - Large"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
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

impl ProductVariant {
  pub fn validate(&self) -> BotResult<()> {
    if self.product_name.trim().is_empty() {
      return Err(BotError::Validation("Product Name is required.".to_string()));
    }
    if self.variant_name.trim().is_empty() {
      return Err(BotError::Validation("Variant Name is required.".to_string()));
    }
    if self.unit_price_cents < 0 {
      return Err(BotError::Validation(
        "Unit Price must be a non-negative number.".to_string(),
      ));
    }
    if self.stock_quantity < 0 {
      return Err(BotError::Validation(
        "Stock Quantity must be a non-negative number.".to_string(),
      ));
    }
    Ok(())
  }

  /// Available and with at least one unit in stock.
  pub fn is_sellable(&self) -> bool {
    self.is_available && self.stock_quantity > 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn variant() -> ProductVariant {
    ProductVariant {
      id: "Coca Cola - Small".to_string(),
      product_name: "Coca Cola".to_string(),
      variant_name: "Coca Cola - Small".to_string(),
      variant_type: Some("Size".to_string()),
      unit_price_cents: 8_000,
      currency: "KES".to_string(),
      stock_quantity: 10,
      is_available: true,
      description: None,
    }
  }

  #[test]
  fn rejects_negative_stock_and_price() {
    let mut v = variant();
    v.stock_quantity = -1;
    assert!(matches!(v.validate(), Err(BotError::Validation(_))));

    let mut v = variant();
    v.unit_price_cents = -1;
    assert!(matches!(v.validate(), Err(BotError::Validation(_))));

    assert!(variant().validate().is_ok());
  }

  #[test]
  fn out_of_stock_is_not_sellable() {
    let mut v = variant();
    v.stock_quantity = 0;
    assert!(!v.is_sellable());
  }
}
