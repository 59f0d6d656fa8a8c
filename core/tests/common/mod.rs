// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::{DateTime, TimeZone, Utc};
use orderbot::{MemoryStore, OrderBot, OrderRequest, ProductVariant, RecordingMessenger};
use std::sync::Arc;
use tracing::Level;

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Catalog fixtures ---
pub fn variant(product: &str, size: &str, price_major: i64, stock: i32) -> ProductVariant {
  let name = format!("{} - {}", product, size);
  ProductVariant {
    id: name.clone(),
    product_name: product.to_string(),
    variant_name: name,
    variant_type: Some("Size".to_string()),
    unit_price_cents: price_major * 100,
    currency: "KES".to_string(),
    stock_quantity: stock,
    is_available: true,
    description: None,
  }
}

/// Five sellable variants; menu order is Beef Single, Chicken Double, Coca Cola Small, Pizza Large, Pizza Small.
pub fn small_catalog() -> Vec<ProductVariant> {
  vec![
    variant("Pizza Margherita", "Small", 800, 50),
    variant("Pizza Margherita", "Large", 1600, 3),
    variant("Chicken Burger", "Double", 650, 80),
    variant("Beef Burger", "Single", 500, 100),
    variant("Coca Cola", "Small", 80, 200),
  ]
}

pub const CUSTOMER_PHONE: &str = "254700000001";

// --- Wiring ---
pub struct TestBot {
  pub bot: OrderBot,
  pub store: Arc<MemoryStore>,
  pub messenger: Arc<RecordingMessenger>,
}

pub fn test_bot(variants: Vec<ProductVariant>) -> TestBot {
  let store = Arc::new(MemoryStore::with_variants(variants));
  let messenger = Arc::new(RecordingMessenger::new());
  let bot = OrderBot::new(store.clone(), messenger.clone(), "KES");
  TestBot { bot, store, messenger }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn variant_request(variant_id: &str, quantity: i32) -> OrderRequest {
  OrderRequest {
    customer_name: "John Doe".to_string(),
    phone_number: CUSTOMER_PHONE.to_string(),
    delivery_address: "123 Main Street".to_string(),
    variant_id: Some(variant_id.to_string()),
    quantity,
    ..Default::default()
  }
}

pub fn manual_request(item: &str, quantity: i32, created_at: DateTime<Utc>) -> OrderRequest {
  OrderRequest {
    customer_name: "Test Customer".to_string(),
    phone_number: "254712345678".to_string(),
    delivery_address: "123 Test Street".to_string(),
    item: Some(item.to_string()),
    quantity,
    created_at: Some(created_at),
    ..Default::default()
  }
}
