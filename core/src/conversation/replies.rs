// core/src/conversation/replies.rs

//! Chat reply texts.

use crate::catalog::{menu_lines, MenuItem};
use crate::models::format_money;

pub fn help() -> String {
  "Hi! Type 'order' to start placing an order. Type 'cancel' to stop anytime.".to_string()
}

pub fn menu(items: &[MenuItem]) -> String {
  format!(
    "🍕 Welcome! Here's our menu:\n\n{}\nReply with the number (1-{}) or item name to select.",
    menu_lines(items),
    items.len()
  )
}

pub fn menu_unavailable() -> String {
  "Sorry, our menu is unavailable right now. Please try again later.".to_string()
}

pub fn item_selected(item_name: &str) -> String {
  format!(
    "Great! You selected: {}\n\nHow many would you like? (Enter a number)",
    item_name
  )
}

pub fn item_not_understood(menu_size: usize) -> String {
  format!(
    "Sorry, I didn't understand. Please reply with a number (1-{}) or type the item name.",
    menu_size
  )
}

pub fn quantity_accepted(quantity: i32, item_name: &str, total_cents: i64, currency: &str) -> String {
  format!(
    "Perfect! {}x {}\nTotal: {}\n\nPlease enter your delivery address:",
    quantity,
    item_name,
    format_money(total_cents, currency)
  )
}

pub fn quantity_out_of_range(min: i64, max: i64) -> String {
  format!("Please enter a quantity between {} and {}.", min, max)
}

pub fn quantity_not_a_number() -> String {
  "Please enter a valid number for quantity.".to_string()
}

pub fn address_too_short(min_chars: usize) -> String {
  format!(
    "Please enter a complete delivery address (at least {} characters).",
    min_chars
  )
}

pub fn order_summary(
  quantity: i32,
  item_name: &str,
  unit_price_cents: i64,
  currency: &str,
  delivery_address: &str,
) -> String {
  let total = i64::from(quantity) * unit_price_cents;
  format!(
    "📋 Order Summary:\n\nItem: {}x {}\nPrice per item: {}\nTotal: {}\nDelivery to: {}\n\nConfirm this order? Reply 'yes' to place order or 'no' to cancel.",
    quantity,
    item_name,
    format_money(unit_price_cents, currency),
    format_money(total, currency),
    delivery_address
  )
}

pub fn confirmation_expected() -> String {
  "Please reply 'yes' to confirm or 'no' to cancel.".to_string()
}

pub fn order_placed(order_id: &str) -> String {
  format!(
    "✅ Order placed successfully!\n\nOrder Number: {}\nEstimated delivery: 30 minutes\n\nThank you for your order! 🎉",
    order_id
  )
}

pub fn order_failed() -> String {
  "Sorry, there was an error placing your order. Reply 'yes' to try again or 'cancel' to stop.".to_string()
}

pub fn incomplete_order() -> String {
  "Sorry, some of your order details were lost. Type 'order' to start again.".to_string()
}

pub fn cancelled() -> String {
  "Order cancelled. Type 'order' to start a new order anytime! 👋".to_string()
}
