// core/src/conversation/machine.rs

//! The ordering conversation as a pure function of (session, input, menu).
//!
//! Nothing here touches the store or the messenger. `advance` returns the next
//! session, the reply to send, and optionally an order to place; the caller
//! performs the side effects and reports back through `order_placed` or
//! `order_failed`.

use crate::catalog::MenuItem;
use crate::conversation::replies;
use crate::models::{Session, SessionStatus, SessionStep};
use chrono::{DateTime, Utc};

pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 20;
pub const MIN_ADDRESS_CHARS: usize = 5;
/// Shorter inputs only match an item name that they fully contain.
const MIN_PARTIAL_NAME_CHARS: usize = 3;

const START_WORDS: [&str; 3] = ["order", "menu", "start"];
const CANCEL_WORDS: [&str; 3] = ["cancel", "stop", "quit"];
const CONFIRM_WORDS: [&str; 3] = ["yes", "y", "confirm"];
const DECLINE_WORDS: [&str; 3] = ["no", "n", "cancel"];

/// Order details collected by a conversation, ready to hand to the order manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
  pub phone_number: String,
  pub variant_id: String,
  pub item_name: String,
  pub quantity: i32,
  pub unit_price_cents: i64,
  pub currency: String,
  pub delivery_address: String,
}

impl PlaceOrder {
  fn from_session(session: &Session) -> Option<Self> {
    Some(Self {
      phone_number: session.phone_number.clone(),
      variant_id: session.selected_variant_id.clone()?,
      item_name: session.item_name.clone()?,
      quantity: session.quantity?,
      unit_price_cents: session.unit_price_cents?,
      currency: session.currency.clone()?,
      delivery_address: session.delivery_address.clone()?,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
  pub session: Session,
  /// `None` only while `action` is pending; the action's outcome supplies the reply.
  pub reply: Option<String>,
  pub action: Option<PlaceOrder>,
}

impl Transition {
  fn reply(session: Session, reply: String) -> Self {
    Self {
      session,
      reply: Some(reply),
      action: None,
    }
  }
}

/// Advances `session` by one inbound message.
pub fn advance(session: &Session, input: &str, menu: &[MenuItem], now: DateTime<Utc>) -> Transition {
  let text = input.trim();
  let command = text.to_lowercase();
  let mut next = session.clone();
  next.updated_at = now;

  if START_WORDS.contains(&command.as_str()) {
    next.clear_selection();
    if menu.is_empty() {
      next.step = SessionStep::AwaitingCommand;
      return Transition::reply(next, replies::menu_unavailable());
    }
    next.step = SessionStep::AwaitingItem;
    return Transition::reply(next, replies::menu(menu));
  }

  if CANCEL_WORDS.contains(&command.as_str()) {
    next.status = SessionStatus::Cancelled;
    return Transition::reply(next, replies::cancelled());
  }

  match session.step {
    SessionStep::AwaitingItem => select_item(next, text, menu),
    SessionStep::AwaitingQuantity => choose_quantity(next, text),
    SessionStep::AwaitingAddress => enter_address(next, text),
    SessionStep::AwaitingConfirmation => confirm(next, &command),
    SessionStep::AwaitingCommand => Transition::reply(next, replies::help()),
  }
}

/// Marks the session completed once the order exists.
pub fn order_placed(session: &Session, order_id: &str, now: DateTime<Utc>) -> Transition {
  let mut next = session.clone();
  next.status = SessionStatus::Completed;
  next.order_id = Some(order_id.to_string());
  next.updated_at = now;
  Transition::reply(next, replies::order_placed(order_id))
}

/// Keeps the session at confirmation so a later "yes" retries.
pub fn order_failed(session: &Session, now: DateTime<Utc>) -> Transition {
  let mut next = session.clone();
  next.step = SessionStep::AwaitingConfirmation;
  next.updated_at = now;
  Transition::reply(next, replies::order_failed())
}

/// Resolves a menu choice: a 1-based number first, then a name match in menu order.
pub fn match_menu_item<'m>(input: &str, menu: &'m [MenuItem]) -> Option<&'m MenuItem> {
  let text = input.trim();
  if let Ok(number) = text.parse::<usize>() {
    if (1..=menu.len()).contains(&number) {
      return menu.get(number - 1);
    }
  }

  let needle = text.to_lowercase();
  if needle.is_empty() {
    return None;
  }
  menu.iter().find(|item| {
    let name = item.name.to_lowercase();
    needle.contains(&name) || (needle.chars().count() >= MIN_PARTIAL_NAME_CHARS && name.contains(&needle))
  })
}

fn select_item(mut next: Session, text: &str, menu: &[MenuItem]) -> Transition {
  match match_menu_item(text, menu) {
    Some(item) => {
      next.selected_variant_id = Some(item.variant_id.clone());
      next.item_name = Some(item.name.clone());
      next.unit_price_cents = Some(item.unit_price_cents);
      next.currency = Some(item.currency.clone());
      next.step = SessionStep::AwaitingQuantity;
      Transition::reply(next, replies::item_selected(&item.name))
    }
    None => {
      let size = menu.len().max(1);
      Transition::reply(next, replies::item_not_understood(size))
    }
  }
}

fn choose_quantity(mut next: Session, text: &str) -> Transition {
  let quantity = match text.parse::<i64>() {
    Ok(q) => q,
    Err(_) => return Transition::reply(next, replies::quantity_not_a_number()),
  };
  if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
    return Transition::reply(next, replies::quantity_out_of_range(MIN_QUANTITY, MAX_QUANTITY));
  }
  // Bounded by MAX_QUANTITY above.
  let quantity = quantity as i32;

  next.quantity = Some(quantity);
  next.step = SessionStep::AwaitingAddress;
  let item_name = next.item_name.clone().unwrap_or_default();
  let currency = next.currency.clone().unwrap_or_default();
  let total = next.total_cents().unwrap_or(0);
  let reply = replies::quantity_accepted(quantity, &item_name, total, &currency);
  Transition::reply(next, reply)
}

fn enter_address(mut next: Session, text: &str) -> Transition {
  if text.chars().count() < MIN_ADDRESS_CHARS {
    return Transition::reply(next, replies::address_too_short(MIN_ADDRESS_CHARS));
  }
  next.delivery_address = Some(text.to_string());
  next.step = SessionStep::AwaitingConfirmation;
  let reply = replies::order_summary(
    next.quantity.unwrap_or(0),
    next.item_name.as_deref().unwrap_or_default(),
    next.unit_price_cents.unwrap_or(0),
    next.currency.as_deref().unwrap_or_default(),
    text,
  );
  Transition::reply(next, reply)
}

fn confirm(mut next: Session, command: &str) -> Transition {
  if CONFIRM_WORDS.contains(&command) {
    return match PlaceOrder::from_session(&next) {
      Some(action) => Transition {
        session: next,
        reply: None,
        action: Some(action),
      },
      None => {
        next.clear_selection();
        next.step = SessionStep::AwaitingCommand;
        Transition::reply(next, replies::incomplete_order())
      }
    };
  }
  if DECLINE_WORDS.contains(&command) {
    next.status = SessionStatus::Cancelled;
    return Transition::reply(next, replies::cancelled());
  }
  Transition::reply(next, replies::confirmation_expected())
}
