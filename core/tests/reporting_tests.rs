// tests/reporting_tests.rs
mod common;

use chrono::NaiveDate;
use common::*;
use orderbot::{BotError, OrderStatus, SearchParams};
use serial_test::serial;

async fn seeded() -> TestBot {
  let t = test_bot(small_catalog());
  let orders = &t.bot.orders;
  orders.place_order(manual_request("Pizza", 2, at(2026, 9, 24, 9))).await.unwrap();
  orders.place_order(manual_request("Burger", 1, at(2026, 9, 24, 12))).await.unwrap();
  orders.place_order(manual_request("Pizza", 3, at(2026, 9, 24, 18))).await.unwrap();
  orders.place_order(manual_request("Soda", 6, at(2026, 9, 25, 8))).await.unwrap();

  let mut jane = manual_request("Pizza", 1, at(2026, 9, 23, 20));
  jane.customer_name = "Jane Wanjiru".to_string();
  jane.phone_number = "254733000111".to_string();
  orders.place_order(jane).await.unwrap();
  t
}

fn day(d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
}

#[tokio::test]
#[serial]
async fn test_customer_orders_requires_a_filter() {
  setup_tracing();
  let t = seeded().await;
  let err = t.bot.reports.customer_orders(None, Some("  ")).await.unwrap_err();
  assert!(matches!(err, BotError::Validation(_)));
}

#[tokio::test]
#[serial]
async fn test_customer_orders_by_phone_and_name() {
  setup_tracing();
  let t = seeded().await;

  let by_phone = t.bot.reports.customer_orders(Some("254712345678"), None).await.unwrap();
  assert_eq!(by_phone.len(), 4);
  assert_eq!(by_phone[0].item, "Soda");

  let by_name = t.bot.reports.customer_orders(None, Some("wanjiru")).await.unwrap();
  assert_eq!(by_name.len(), 1);
  assert_eq!(by_name[0].customer_name, "Jane Wanjiru");
}

#[tokio::test]
#[serial]
async fn test_history_is_newest_first_and_limited() {
  setup_tracing();
  let t = seeded().await;
  let history = t.bot.reports.order_history("254712345678", Some(2)).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].item, "Soda");
  assert_eq!(history[1].quantity, 3);
}

#[tokio::test]
#[serial]
async fn test_search_matches_text_status_and_dates() {
  setup_tracing();
  let t = seeded().await;

  let pizzas = t
    .bot
    .reports
    .search_orders(&SearchParams {
      text: Some("PIZZA".to_string()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(pizzas.len(), 3);

  let first = pizzas.last().unwrap().clone();
  t.bot.orders.update_status(&first.id, "Confirmed", None).await.unwrap();
  let confirmed = t
    .bot
    .reports
    .search_orders(&SearchParams {
      status: Some(OrderStatus::Confirmed),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(confirmed.len(), 1);
  assert_eq!(confirmed[0].id, first.id);

  let by_id = t
    .bot
    .reports
    .search_orders(&SearchParams {
      text: Some(first.id.to_lowercase()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_id.len(), 1);

  let ranged = t
    .bot
    .reports
    .search_orders(&SearchParams {
      date_from: Some(day(24)),
      date_to: Some(day(24)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(ranged.len(), 3);
}

#[tokio::test]
#[serial]
async fn test_orders_by_date_needs_parameters() {
  setup_tracing();
  let t = seeded().await;
  assert!(matches!(
    t.bot.reports.orders_by_date(None, None, None).await,
    Err(BotError::Validation(_))
  ));

  let single = t.bot.reports.orders_by_date(Some(day(25)), None, None).await.unwrap();
  assert_eq!(single.len(), 1);

  let open_ended = t.bot.reports.orders_by_date(None, Some(day(24)), None).await.unwrap();
  assert_eq!(open_ended.len(), 4);
}

#[tokio::test]
#[serial]
async fn test_daily_summary_groups_by_product_and_status() {
  setup_tracing();
  let t = seeded().await;
  let listed = t.bot.reports.orders_by_date(Some(day(24)), None, None).await.unwrap();
  let burger = listed.iter().find(|o| o.item == "Burger").unwrap();
  t.bot.orders.cancel_order(&burger.id, None).await.unwrap();

  let summary = t.bot.reports.daily_summary(day(24)).await.unwrap();
  assert_eq!(summary.total_orders, 3);
  assert_eq!(summary.total_quantity, 6);
  assert_eq!(summary.status_breakdown.get("Pending"), Some(&2));
  assert_eq!(summary.status_breakdown.get("Cancelled"), Some(&1));

  assert_eq!(summary.products.len(), 2);
  let pizza = &summary.products[0];
  assert_eq!(pizza.item_name, "Pizza");
  assert_eq!(pizza.total_quantity, 5);
  assert_eq!(pizza.order_count, 2);
  assert_eq!(pizza.orders[0].quantity, 2);
}

#[tokio::test]
#[serial]
async fn test_order_products_reports_pricing() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Chicken Burger - Double", 4))
    .await
    .unwrap();

  let products = t.bot.reports.order_products(&order.id).await.unwrap();
  assert_eq!(products.total_items, 1);
  assert_eq!(products.total_quantity, 4);
  assert_eq!(products.products[0].unit_price_cents, 65_000);
  assert_eq!(products.products[0].total_price_cents, 260_000);
}
