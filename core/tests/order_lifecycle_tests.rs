// tests/order_lifecycle_tests.rs
mod common;

use common::*;
use orderbot::orders::status_notification;
use orderbot::{BotError, ErrorKind, NewOrder, OrderStatus, RecordStore};
use serial_test::serial;
use std::sync::Arc;

fn unreserved_draft(variant_id: &str, quantity: i32) -> NewOrder {
  NewOrder {
    customer_name: "John Doe".to_string(),
    phone_number: CUSTOMER_PHONE.to_string(),
    item: "Pizza Margherita".to_string(),
    variant_id: Some(variant_id.to_string()),
    variant_name: Some(variant_id.to_string()),
    quantity,
    unit_price_cents: 160_000,
    currency: "KES".to_string(),
    delivery_address: "123 Main Street".to_string(),
    created_at: chrono::Utc::now(),
  }
}

#[tokio::test]
#[serial]
async fn test_variant_order_is_priced_from_variant_and_reserves_stock() {
  setup_tracing();
  let t = test_bot(small_catalog());

  let order = t
    .bot
    .orders
    .place_order(variant_request("Pizza Margherita - Small", 2))
    .await
    .unwrap();

  assert!(order.id.starts_with("WOR-"));
  assert_eq!(order.item, "Pizza Margherita");
  assert_eq!(order.variant_name.as_deref(), Some("Pizza Margherita - Small"));
  assert_eq!(order.unit_price_cents, 80_000);
  assert_eq!(order.total_price_cents, 160_000);
  assert_eq!(order.currency, "KES");
  assert!(order.stock_reserved);

  let variant = t.store.get_variant("Pizza Margherita - Small").await.unwrap().unwrap();
  assert_eq!(variant.stock_quantity, 48);

  let customer = t.store.find_customer_by_phone(CUSTOMER_PHONE).await.unwrap().unwrap();
  assert_eq!(customer.name, "John Doe");

  let fetched = t.bot.orders.get_order(&order.id).await.unwrap();
  assert_eq!(fetched, order);
}

#[tokio::test]
#[serial]
async fn test_insufficient_stock_rejects_and_leaves_stock_unchanged() {
  setup_tracing();
  let t = test_bot(small_catalog());

  let err = t
    .bot
    .orders
    .place_order(variant_request("Pizza Margherita - Large", 5))
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    BotError::InsufficientStock {
      available: 3,
      requested: 5,
      ..
    }
  ));
  assert!(err.to_string().contains("Available: 3"));
  assert_eq!(err.kind(), ErrorKind::BusinessRule);

  let variant = t.store.get_variant("Pizza Margherita - Large").await.unwrap().unwrap();
  assert_eq!(variant.stock_quantity, 3);
  assert!(t.store.query_orders(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_validation_rules() {
  setup_tracing();
  let t = test_bot(small_catalog());

  let mut short_phone = variant_request("Coca Cola - Small", 1);
  short_phone.phone_number = "12345".to_string();
  let err = t.bot.orders.place_order(short_phone).await.unwrap_err();
  assert_eq!(err.to_string(), "Please enter a valid phone number");

  let zero = variant_request("Coca Cola - Small", 0);
  assert!(matches!(t.bot.orders.place_order(zero).await, Err(BotError::Validation(_))));

  let mut no_address = variant_request("Coca Cola - Small", 1);
  no_address.delivery_address = "   ".to_string();
  assert!(matches!(t.bot.orders.place_order(no_address).await, Err(BotError::Validation(_))));

  let missing = variant_request("Coca Cola - Jumbo", 1);
  assert!(matches!(t.bot.orders.place_order(missing).await, Err(BotError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn test_unavailable_variant_is_rejected() {
  setup_tracing();
  let mut retired = variant("Orange Juice", "Small", 100, 90);
  retired.is_available = false;
  let t = test_bot(vec![retired]);

  let err = t
    .bot
    .orders
    .place_order(variant_request("Orange Juice - Small", 1))
    .await
    .unwrap_err();
  assert!(matches!(err, BotError::VariantUnavailable(_)));
}

#[tokio::test]
#[serial]
async fn test_manual_order_uses_supplied_price_or_zero() {
  setup_tracing();
  let t = test_bot(vec![]);

  let free = t
    .bot
    .orders
    .place_order(manual_request("Pizza", 2, at(2026, 5, 1, 9)))
    .await
    .unwrap();
  assert_eq!(free.id, "WOR-2026-00001");
  assert_eq!(free.total_price_cents, 0);
  assert!(!free.stock_reserved);

  let mut priced = manual_request("Burger", 3, at(2026, 5, 1, 10));
  priced.unit_price_cents = Some(45_000);
  let priced = t.bot.orders.place_order(priced).await.unwrap();
  assert_eq!(priced.total_price_cents, 135_000);
  assert_eq!(priced.currency, "KES");
}

#[tokio::test]
#[serial]
async fn test_status_update_records_comment_and_notifies() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Beef Burger - Single", 1))
    .await
    .unwrap();

  let change = t
    .bot
    .orders
    .update_status(&order.id, "Out for Delivery", Some("Rider Ann".to_string()))
    .await
    .unwrap();
  assert_eq!(change.old_status, OrderStatus::Pending);
  assert_eq!(change.order.status, OrderStatus::OutForDelivery);

  let comments = t.bot.orders.comments(&order.id).await.unwrap();
  assert_eq!(comments.len(), 1);
  assert_eq!(
    comments[0].body,
    "Status changed from Pending to Out for Delivery. Notes: Rider Ann"
  );

  assert_eq!(t.messenger.last_body(), Some(status_notification(&change.order)));
  assert!(t.messenger.last_body().unwrap().contains("Your order is on its way!"));
}

#[tokio::test]
#[serial]
async fn test_status_update_survives_notification_failure() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Beef Burger - Single", 1))
    .await
    .unwrap();
  t.messenger.set_failing(true);

  let change = t.bot.orders.update_status(&order.id, "Preparing", None).await.unwrap();
  assert_eq!(change.order.status, OrderStatus::Preparing);

  let comments = t.bot.orders.comments(&order.id).await.unwrap();
  assert_eq!(comments[0].body, "Status changed from Pending to Preparing");
}

#[tokio::test]
#[serial]
async fn test_invalid_status_value_is_rejected() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Beef Burger - Single", 1))
    .await
    .unwrap();

  let err = t.bot.orders.update_status(&order.id, "Shipped", None).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
#[serial]
async fn test_cancel_releases_reserved_stock_with_default_reason() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Coca Cola - Small", 10))
    .await
    .unwrap();
  assert_eq!(t.store.get_variant("Coca Cola - Small").await.unwrap().unwrap().stock_quantity, 190);
  t.messenger.clear();

  let change = t.bot.orders.cancel_order(&order.id, None).await.unwrap();
  assert_eq!(change.order.status, OrderStatus::Cancelled);
  assert!(!change.order.stock_reserved);
  assert_eq!(t.store.get_variant("Coca Cola - Small").await.unwrap().unwrap().stock_quantity, 200);

  let comments = t.bot.orders.comments(&order.id).await.unwrap();
  assert_eq!(comments[0].body, "Order cancelled. Reason: Customer requested cancellation");
  assert!(t.messenger.sent().is_empty());
}

#[tokio::test]
#[serial]
async fn test_cancelling_delivered_order_is_rejected() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Coca Cola - Small", 1))
    .await
    .unwrap();
  t.bot.orders.update_status(&order.id, "Delivered", None).await.unwrap();

  let err = t
    .bot
    .orders
    .cancel_order(&order.id, Some("Changed my mind".to_string()))
    .await
    .unwrap_err();
  assert!(matches!(err, BotError::OrderClosed { .. }));
  assert_eq!(err.kind(), ErrorKind::BusinessRule);
  assert_eq!(t.bot.orders.get_order(&order.id).await.unwrap().status, OrderStatus::Delivered);
  assert_eq!(t.store.get_variant("Coca Cola - Small").await.unwrap().unwrap().stock_quantity, 199);
}

#[tokio::test]
#[serial]
async fn test_cancelled_order_cannot_change_status() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Coca Cola - Small", 1))
    .await
    .unwrap();
  t.bot.orders.cancel_order(&order.id, Some("Duplicate".to_string())).await.unwrap();

  let err = t.bot.orders.update_status(&order.id, "Confirmed", None).await.unwrap_err();
  assert!(matches!(err, BotError::OrderClosed { .. }));
}

#[tokio::test]
#[serial]
async fn test_unknown_order_is_not_found() {
  setup_tracing();
  let t = test_bot(vec![]);
  let err = t.bot.orders.cancel_order("WOR-2026-99999", None).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[serial]
async fn test_store_transition_rejects_stale_expected_status() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let order = t
    .bot
    .orders
    .place_order(variant_request("Coca Cola - Small", 1))
    .await
    .unwrap();
  t.bot.orders.update_status(&order.id, "Confirmed", None).await.unwrap();

  let stale = orderbot::store::OrderTransition {
    order_id: order.id.clone(),
    expected_status: OrderStatus::Pending,
    new_status: OrderStatus::Cancelled,
    stock_effect: orderbot::store::StockEffect::Release,
    comment: "late cancel".to_string(),
    at: chrono::Utc::now(),
  };
  let err = t.store.transition_order(stale).await.unwrap_err();
  assert!(matches!(err, BotError::Conflict(_)));
  assert_eq!(t.store.get_variant("Coca Cola - Small").await.unwrap().unwrap().stock_quantity, 199);
}

#[tokio::test]
#[serial]
async fn test_stock_never_goes_negative_across_orders() {
  setup_tracing();
  let t = test_bot(small_catalog());

  let first = t
    .bot
    .orders
    .place_order(variant_request("Pizza Margherita - Large", 2))
    .await
    .unwrap();
  assert!(first.stock_reserved);
  let second = t
    .bot
    .orders
    .place_order(variant_request("Pizza Margherita - Large", 2))
    .await;
  assert!(matches!(second, Err(BotError::InsufficientStock { available: 1, .. })));

  let variant = t.store.get_variant("Pizza Margherita - Large").await.unwrap().unwrap();
  assert_eq!(variant.stock_quantity, 1);
}

#[tokio::test]
#[serial]
async fn test_confirming_an_unreserved_order_takes_stock() {
  setup_tracing();
  let t = test_bot(small_catalog());
  let large = "Pizza Margherita - Large";

  let first = t.store.place_order(unreserved_draft(large, 2), false).await.unwrap();
  assert!(!first.stock_reserved);
  assert_eq!(t.store.get_variant(large).await.unwrap().unwrap().stock_quantity, 3);

  let confirmed = t.bot.orders.update_status(&first.id, "Confirmed", None).await.unwrap();
  assert_eq!(confirmed.old_status, OrderStatus::Pending);
  assert!(confirmed.order.stock_reserved);
  assert_eq!(t.store.get_variant(large).await.unwrap().unwrap().stock_quantity, 1);

  let second = t.store.place_order(unreserved_draft(large, 2), false).await.unwrap();
  let err = t.bot.orders.update_status(&second.id, "Confirmed", None).await.unwrap_err();
  assert!(matches!(
    err,
    BotError::InsufficientStock {
      available: 1,
      requested: 2,
      ..
    }
  ));
  let unchanged = t.bot.orders.get_order(&second.id).await.unwrap();
  assert_eq!(unchanged.status, OrderStatus::Pending);
  assert!(!unchanged.stock_reserved);
  assert_eq!(t.store.get_variant(large).await.unwrap().unwrap().stock_quantity, 1);

  t.bot.orders.cancel_order(&first.id, None).await.unwrap();
  assert_eq!(t.store.get_variant(large).await.unwrap().unwrap().stock_quantity, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_concurrent_orders_never_oversell() {
  setup_tracing();
  let t = Arc::new(test_bot(small_catalog()));
  let large = "Pizza Margherita - Large";

  let attempts: Vec<_> = (0..16)
    .map(|_| {
      let t = t.clone();
      tokio::spawn(async move { t.bot.orders.place_order(variant_request(large, 1)).await })
    })
    .collect();

  let mut placed = 0;
  for attempt in attempts {
    match attempt.await.unwrap() {
      Ok(order) => {
        assert!(order.stock_reserved);
        placed += 1;
      }
      Err(err) => assert!(matches!(err, BotError::InsufficientStock { .. }), "unexpected: {}", err),
    }
  }

  assert_eq!(placed, 3);
  assert_eq!(t.store.get_variant(large).await.unwrap().unwrap().stock_quantity, 0);
  assert_eq!(t.store.query_orders(&Default::default()).await.unwrap().len(), 3);
}
