// core/src/store/mod.rs

//! Persistence boundary. Every component receives an `Arc<dyn RecordStore>`;
//! there is no ambient global store.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::BotResult;
use crate::models::{Customer, NewCustomer, NewOrder, Order, OrderComment, OrderStatus, ProductVariant, Session};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type SharedStore = Arc<dyn RecordStore>;

/// Filter for `RecordStore::list_variants`.
///
/// Results are ordered by product name, then variant name.
#[derive(Debug, Clone, Default)]
pub struct VariantFilter {
  /// Case-insensitive substring match on the product name.
  pub product_name: Option<String>,
  pub available_only: bool,
}

/// Filter for `RecordStore::query_orders`. Empty fields do not constrain the result.
///
/// Results are ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
  pub phone_number: Option<String>,
  /// Case-insensitive substring match on the customer name.
  pub name_contains: Option<String>,
  pub status: Option<OrderStatus>,
  /// Case-insensitive substring match on the order id, customer name or item.
  pub text: Option<String>,
  /// Inclusive lower bound on `created_at`.
  pub created_from: Option<DateTime<Utc>>,
  /// Exclusive upper bound on `created_at`.
  pub created_to: Option<DateTime<Utc>>,
  pub limit: Option<usize>,
}

impl OrderQuery {
  pub fn matches(&self, order: &Order) -> bool {
    if let Some(phone) = &self.phone_number {
      if &order.phone_number != phone {
        return false;
      }
    }
    if let Some(name) = &self.name_contains {
      if !contains_ignore_case(&order.customer_name, name) {
        return false;
      }
    }
    if let Some(status) = self.status {
      if order.status != status {
        return false;
      }
    }
    if let Some(text) = &self.text {
      let hit = contains_ignore_case(&order.id, text)
        || contains_ignore_case(&order.customer_name, text)
        || contains_ignore_case(&order.item, text);
      if !hit {
        return false;
      }
    }
    if self.created_from.is_some_and(|from| order.created_at < from) {
      return false;
    }
    if self.created_to.is_some_and(|to| order.created_at >= to) {
      return false;
    }
    true
  }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Stock adjustment applied in the same atomic write as a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
  None,
  /// Decrement the variant's stock by the order quantity, unless already reserved.
  Reserve,
  /// Give back the reserved quantity, if the order holds a reservation.
  Release,
}

/// A compare-and-set status change on one order.
#[derive(Debug, Clone)]
pub struct OrderTransition {
  pub order_id: String,
  pub expected_status: OrderStatus,
  pub new_status: OrderStatus,
  pub stock_effect: StockEffect,
  /// Audit comment appended with the change.
  pub comment: String,
  pub at: DateTime<Utc>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
  async fn list_variants(&self, filter: &VariantFilter) -> BotResult<Vec<ProductVariant>>;

  async fn get_variant(&self, variant_id: &str) -> BotResult<Option<ProductVariant>>;

  /// Inserts or replaces the variant with the same id.
  async fn upsert_variant(&self, variant: &ProductVariant) -> BotResult<()>;

  async fn find_active_session(&self, phone_number: &str) -> BotResult<Option<Session>>;

  /// Fails with `Conflict` when the phone number already has an active session.
  async fn insert_session(&self, session: &Session) -> BotResult<()>;

  async fn update_session(&self, session: &Session) -> BotResult<()>;

  async fn find_customer_by_phone(&self, phone_number: &str) -> BotResult<Option<Customer>>;

  /// Fails with `Conflict` when a customer with the same phone number exists.
  async fn insert_customer(&self, customer: NewCustomer) -> BotResult<Customer>;

  /// Assigns the order number and writes the order.
  ///
  /// With `reserve_stock` and a variant id, the variant's stock is decremented
  /// by the order quantity in the same atomic write. If there is not enough
  /// stock nothing is written and `InsufficientStock` is returned.
  async fn place_order(&self, new_order: NewOrder, reserve_stock: bool) -> BotResult<Order>;

  async fn get_order(&self, order_id: &str) -> BotResult<Option<Order>>;

  async fn query_orders(&self, query: &OrderQuery) -> BotResult<Vec<Order>>;

  /// Applies the status change only if the order still has `expected_status`;
  /// otherwise returns `Conflict`. Stock effect, status and comment commit together.
  async fn transition_order(&self, transition: OrderTransition) -> BotResult<Order>;

  /// Audit comments for an order, oldest first.
  async fn order_comments(&self, order_id: &str) -> BotResult<Vec<OrderComment>>;
}
