// src/seed.rs

use orderbot::{BotResult, ProductVariant, RecordStore};

/// (product, size, price in whole currency units, stock, description)
const SAMPLE_VARIANTS: &[(&str, &str, i64, i32, &str)] = &[
  ("Pizza Margherita", "Small", 800, 50, "Classic Margherita, small size"),
  ("Pizza Margherita", "Medium", 1200, 75, "Classic Margherita, medium size"),
  ("Pizza Margherita", "Large", 1600, 100, "Classic Margherita, large size"),
  ("Pizza Pepperoni", "Small", 900, 40, "Spicy Pepperoni, small size"),
  ("Pizza Pepperoni", "Medium", 1350, 60, "Spicy Pepperoni, medium size"),
  ("Pizza Pepperoni", "Large", 1800, 80, "Spicy Pepperoni, large size"),
  ("Chicken Burger", "Single", 450, 120, "Single patty chicken burger"),
  ("Chicken Burger", "Double", 650, 80, "Double patty chicken burger"),
  ("Beef Burger", "Single", 500, 100, "Single patty beef burger"),
  ("Beef Burger", "Double", 750, 70, "Double patty beef burger"),
  ("Coca Cola", "Small", 80, 200, "Refreshing Coca Cola, small"),
  ("Coca Cola", "Medium", 120, 150, "Refreshing Coca Cola, medium"),
  ("Coca Cola", "Large", 150, 100, "Refreshing Coca Cola, large"),
  ("Orange Juice", "Small", 100, 90, "Fresh orange juice, small"),
  ("Orange Juice", "Large", 180, 60, "Fresh orange juice, large"),
];

pub fn sample_variants(currency: &str) -> Vec<ProductVariant> {
  SAMPLE_VARIANTS
    .iter()
    .map(|&(product, size, price, stock, description)| {
      let variant_name = format!("{} - {}", product, size);
      ProductVariant {
        id: variant_name.clone(),
        product_name: product.to_string(),
        variant_name,
        variant_type: Some("Size".to_string()),
        unit_price_cents: price * 100,
        currency: currency.to_string(),
        stock_quantity: stock,
        is_available: true,
        description: Some(description.to_string()),
      }
    })
    .collect()
}

/// Upserts the sample menu. Safe to run on every start.
pub async fn seed_sample_variants(store: &dyn RecordStore, currency: &str) -> BotResult<usize> {
  let variants = sample_variants(currency);
  for variant in &variants {
    store.upsert_variant(variant).await?;
  }
  tracing::info!(count = variants.len(), "Seeded sample product variants.");
  Ok(variants.len())
}
