// core/src/store/memory.rs

use crate::error::{BotError, BotResult};
use crate::models::{
  format_order_id, Customer, NewCustomer, NewOrder, Order, OrderComment, ProductVariant, Session,
};
use crate::store::{contains_ignore_case, OrderQuery, OrderTransition, RecordStore, StockEffect, VariantFilter};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
  variants: BTreeMap<String, ProductVariant>,
  sessions: HashMap<Uuid, Session>,
  customers: HashMap<String, Customer>,
  orders: HashMap<String, Order>,
  comments: Vec<OrderComment>,
  order_seq: u64,
}

impl Tables {
  /// Compare-and-decrement. Leaves stock untouched on failure.
  fn reserve(&mut self, variant_id: &str, quantity: i32) -> BotResult<()> {
    let variant = self
      .variants
      .get_mut(variant_id)
      .ok_or_else(|| BotError::NotFound(format!("Product variant {} not found.", variant_id)))?;
    if !variant.is_available {
      return Err(BotError::VariantUnavailable(variant_id.to_string()));
    }
    if variant.stock_quantity < quantity {
      return Err(BotError::InsufficientStock {
        variant_id: variant_id.to_string(),
        available: variant.stock_quantity,
        requested: quantity,
      });
    }
    variant.stock_quantity -= quantity;
    Ok(())
  }

  fn release(&mut self, variant_id: &str, quantity: i32) {
    if let Some(variant) = self.variants.get_mut(variant_id) {
      variant.stock_quantity += quantity;
    }
  }
}

/// `RecordStore` kept in process memory behind one mutex, so every operation is atomic.
///
/// Used by tests and when the server runs without `DATABASE_URL`.
#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_variants(variants: impl IntoIterator<Item = ProductVariant>) -> Self {
    let store = Self::new();
    {
      let mut tables = store.tables.lock();
      for variant in variants {
        tables.variants.insert(variant.id.clone(), variant);
      }
    }
    store
  }
}

#[async_trait]
impl RecordStore for MemoryStore {
  async fn list_variants(&self, filter: &VariantFilter) -> BotResult<Vec<ProductVariant>> {
    let tables = self.tables.lock();
    let mut variants: Vec<ProductVariant> = tables
      .variants
      .values()
      .filter(|v| !filter.available_only || v.is_available)
      .filter(|v| {
        filter
          .product_name
          .as_deref()
          .map_or(true, |name| contains_ignore_case(&v.product_name, name))
      })
      .cloned()
      .collect();
    variants.sort_by(|a, b| {
      a.product_name
        .cmp(&b.product_name)
        .then_with(|| a.variant_name.cmp(&b.variant_name))
    });
    Ok(variants)
  }

  async fn get_variant(&self, variant_id: &str) -> BotResult<Option<ProductVariant>> {
    Ok(self.tables.lock().variants.get(variant_id).cloned())
  }

  async fn upsert_variant(&self, variant: &ProductVariant) -> BotResult<()> {
    variant.validate()?;
    self.tables.lock().variants.insert(variant.id.clone(), variant.clone());
    Ok(())
  }

  async fn find_active_session(&self, phone_number: &str) -> BotResult<Option<Session>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .sessions
        .values()
        .find(|s| s.phone_number == phone_number && s.is_active())
        .cloned(),
    )
  }

  async fn insert_session(&self, session: &Session) -> BotResult<()> {
    let mut tables = self.tables.lock();
    let duplicate_active = session.is_active()
      && tables
        .sessions
        .values()
        .any(|s| s.phone_number == session.phone_number && s.is_active());
    if duplicate_active {
      return Err(BotError::Conflict(format!(
        "Phone number {} already has an active session",
        session.phone_number
      )));
    }
    tables.sessions.insert(session.id, session.clone());
    Ok(())
  }

  async fn update_session(&self, session: &Session) -> BotResult<()> {
    let mut tables = self.tables.lock();
    match tables.sessions.get_mut(&session.id) {
      Some(existing) => {
        *existing = session.clone();
        Ok(())
      }
      None => Err(BotError::NotFound(format!("Session {} not found", session.id))),
    }
  }

  async fn find_customer_by_phone(&self, phone_number: &str) -> BotResult<Option<Customer>> {
    Ok(self.tables.lock().customers.get(phone_number).cloned())
  }

  async fn insert_customer(&self, customer: NewCustomer) -> BotResult<Customer> {
    let mut tables = self.tables.lock();
    if tables.customers.contains_key(&customer.phone_number) {
      return Err(BotError::Conflict(format!(
        "Customer with phone number {} already exists",
        customer.phone_number
      )));
    }
    let record = Customer {
      id: Uuid::new_v4(),
      name: customer.name,
      phone_number: customer.phone_number,
      address: customer.address,
      created_at: Utc::now(),
    };
    tables.customers.insert(record.phone_number.clone(), record.clone());
    Ok(record)
  }

  async fn place_order(&self, new_order: NewOrder, reserve_stock: bool) -> BotResult<Order> {
    let mut tables = self.tables.lock();
    let reserved = match (&new_order.variant_id, reserve_stock) {
      (Some(variant_id), true) => {
        tables.reserve(variant_id, new_order.quantity)?;
        true
      }
      _ => false,
    };
    tables.order_seq += 1;
    let order_id = format_order_id(new_order.created_at, tables.order_seq);
    let order = Order::from_new(order_id, new_order, reserved);
    tables.orders.insert(order.id.clone(), order.clone());
    Ok(order)
  }

  async fn get_order(&self, order_id: &str) -> BotResult<Option<Order>> {
    Ok(self.tables.lock().orders.get(order_id).cloned())
  }

  async fn query_orders(&self, query: &OrderQuery) -> BotResult<Vec<Order>> {
    let tables = self.tables.lock();
    let mut orders: Vec<Order> = tables.orders.values().filter(|o| query.matches(o)).cloned().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = query.limit {
      orders.truncate(limit);
    }
    Ok(orders)
  }

  async fn transition_order(&self, transition: OrderTransition) -> BotResult<Order> {
    let mut tables = self.tables.lock();
    let current = tables
      .orders
      .get(&transition.order_id)
      .cloned()
      .ok_or_else(|| BotError::NotFound(format!("Order {} not found", transition.order_id)))?;

    if current.status != transition.expected_status {
      return Err(BotError::Conflict(format!(
        "Order {} changed status to {} concurrently",
        current.id, current.status
      )));
    }

    let mut stock_reserved = current.stock_reserved;
    match (transition.stock_effect, current.variant_id.as_deref()) {
      (StockEffect::Reserve, Some(variant_id)) if !current.stock_reserved => {
        tables.reserve(variant_id, current.quantity)?;
        stock_reserved = true;
      }
      (StockEffect::Release, Some(variant_id)) if current.stock_reserved => {
        tables.release(variant_id, current.quantity);
        stock_reserved = false;
      }
      _ => {}
    }

    let order = tables
      .orders
      .get_mut(&transition.order_id)
      .ok_or_else(|| BotError::Internal(format!("Order {} vanished during transition", transition.order_id)))?;
    order.status = transition.new_status;
    order.stock_reserved = stock_reserved;
    order.updated_at = transition.at;
    let updated = order.clone();

    tables.comments.push(OrderComment {
      id: Uuid::new_v4(),
      order_id: transition.order_id,
      body: transition.comment,
      created_at: transition.at,
    });
    Ok(updated)
  }

  async fn order_comments(&self, order_id: &str) -> BotResult<Vec<OrderComment>> {
    let tables = self.tables.lock();
    Ok(tables.comments.iter().filter(|c| c.order_id == order_id).cloned().collect())
  }
}
