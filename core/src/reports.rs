// core/src/reports.rs

//! Read-only order queries and aggregates.

use crate::error::{BotError, BotResult};
use crate::models::{Order, OrderStatus};
use crate::store::{OrderQuery, SharedStore};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct SearchParams {
  pub text: Option<String>,
  pub status: Option<OrderStatus>,
  pub date_from: Option<NaiveDate>,
  pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductLine {
  pub item_name: String,
  pub variant_name: Option<String>,
  pub quantity: i32,
  pub unit_price_cents: i64,
  pub total_price_cents: i64,
  pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderProducts {
  pub order: Order,
  pub products: Vec<ProductLine>,
  pub total_items: usize,
  pub total_quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductOrderRef {
  pub order_id: String,
  pub quantity: i32,
  pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
  pub item_name: String,
  pub total_quantity: i64,
  pub order_count: usize,
  pub orders: Vec<ProductOrderRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
  pub date: NaiveDate,
  pub total_orders: usize,
  pub total_quantity: i64,
  pub status_breakdown: BTreeMap<String, usize>,
  pub products: Vec<ProductSummary>,
  pub orders: Vec<Order>,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
  date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Exclusive end of `date`, i.e. the start of the next day.
fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
  start_of_day(date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX))
}

#[derive(Clone)]
pub struct Reports {
  store: SharedStore,
}

impl Reports {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  /// Orders for a phone number and/or a customer name fragment; at least one is required.
  pub async fn customer_orders(&self, phone_number: Option<&str>, customer_name: Option<&str>) -> BotResult<Vec<Order>> {
    let phone_number = phone_number.map(str::trim).filter(|s| !s.is_empty());
    let customer_name = customer_name.map(str::trim).filter(|s| !s.is_empty());
    if phone_number.is_none() && customer_name.is_none() {
      return Err(BotError::Validation(
        "Please provide phone_number or customer_name".to_string(),
      ));
    }
    let query = OrderQuery {
      phone_number: phone_number.map(str::to_string),
      name_contains: customer_name.map(str::to_string),
      ..Default::default()
    };
    self.store.query_orders(&query).await
  }

  pub async fn order_status(&self, order_id: &str) -> BotResult<Order> {
    self
      .store
      .get_order(order_id)
      .await?
      .ok_or_else(|| BotError::NotFound(format!("Order {} not found", order_id)))
  }

  pub async fn order_history(&self, phone_number: &str, limit: Option<usize>) -> BotResult<Vec<Order>> {
    if phone_number.trim().is_empty() {
      return Err(BotError::Validation("Please provide phone_number".to_string()));
    }
    let query = OrderQuery {
      phone_number: Some(phone_number.trim().to_string()),
      limit: Some(limit.unwrap_or(DEFAULT_HISTORY_LIMIT)),
      ..Default::default()
    };
    self.store.query_orders(&query).await
  }

  /// Free text over order id, customer name and item, plus status and an inclusive date range.
  #[instrument(name = "Reports::search_orders", skip(self))]
  pub async fn search_orders(&self, params: &SearchParams) -> BotResult<Vec<Order>> {
    let query = OrderQuery {
      text: params.text.clone().filter(|t| !t.trim().is_empty()),
      status: params.status,
      created_from: params.date_from.map(start_of_day),
      created_to: params.date_to.map(end_of_day),
      limit: Some(SEARCH_LIMIT),
      ..Default::default()
    };
    self.store.query_orders(&query).await
  }

  /// Orders created on `date`, or within `date_from..=date_to` (either bound optional).
  pub async fn orders_by_date(
    &self,
    date: Option<NaiveDate>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
  ) -> BotResult<Vec<Order>> {
    let (from, to) = match (date, date_from, date_to) {
      (None, None, None) => {
        return Err(BotError::Validation(
          "Please provide either 'date' or 'date_from' and/or 'date_to' parameters".to_string(),
        ))
      }
      (Some(day), _, _) => (Some(day), Some(day)),
      (None, from, to) => (from, to),
    };
    let query = OrderQuery {
      created_from: from.map(start_of_day),
      created_to: to.map(end_of_day),
      ..Default::default()
    };
    self.store.query_orders(&query).await
  }

  pub async fn order_products(&self, order_id: &str) -> BotResult<OrderProducts> {
    let order = self.order_status(order_id).await?;
    let products = vec![ProductLine {
      item_name: order.item.clone(),
      variant_name: order.variant_name.clone(),
      quantity: order.quantity,
      unit_price_cents: order.unit_price_cents,
      total_price_cents: order.total_price_cents,
      currency: order.currency.clone(),
    }];
    let total_quantity = products.iter().map(|p| i64::from(p.quantity)).sum();
    Ok(OrderProducts {
      total_items: products.len(),
      total_quantity,
      products,
      order,
    })
  }

  #[instrument(name = "Reports::daily_summary", skip(self))]
  pub async fn daily_summary(&self, date: NaiveDate) -> BotResult<DailySummary> {
    let orders = self.orders_by_date(Some(date), None, None).await?;

    let mut products: Vec<ProductSummary> = Vec::new();
    let mut status_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_quantity = 0i64;

    // Oldest first, so per-product order lists read chronologically.
    for order in orders.iter().rev() {
      let idx = match products.iter().position(|p| p.item_name == order.item) {
        Some(idx) => idx,
        None => {
          products.push(ProductSummary {
            item_name: order.item.clone(),
            total_quantity: 0,
            order_count: 0,
            orders: Vec::new(),
          });
          products.len() - 1
        }
      };
      let summary = &mut products[idx];
      summary.total_quantity += i64::from(order.quantity);
      summary.order_count += 1;
      summary.orders.push(ProductOrderRef {
        order_id: order.id.clone(),
        quantity: order.quantity,
        status: order.status,
      });

      *status_breakdown.entry(order.status.to_string()).or_default() += 1;
      total_quantity += i64::from(order.quantity);
    }

    Ok(DailySummary {
      date,
      total_orders: orders.len(),
      total_quantity,
      status_breakdown,
      products,
      orders,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn day_bounds_cover_the_whole_day() {
    let day = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
    assert_eq!(start_of_day(day).to_rfc3339(), "2026-02-28T00:00:00+00:00");
    assert_eq!(end_of_day(day).to_rfc3339(), "2026-03-01T00:00:00+00:00");
  }
}
