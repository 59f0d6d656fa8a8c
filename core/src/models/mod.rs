// core/src/models/mod.rs

//! Typed records persisted by the `RecordStore`.

pub mod customer;
pub mod money;
pub mod order;
pub mod session;
pub mod variant;

pub use customer::{Customer, NewCustomer};
pub use money::format_money;
pub use order::{format_order_id, status_message, NewOrder, Order, OrderComment, OrderStatus};
pub use session::{Session, SessionStatus, SessionStep};
pub use variant::ProductVariant;

/// Counts the digits in a phone number; anything with fewer than ten is rejected.
pub fn phone_digit_count(phone_number: &str) -> usize {
  phone_number.chars().filter(char::is_ascii_digit).count()
}

pub fn validate_phone_number(phone_number: &str) -> crate::BotResult<()> {
  if phone_digit_count(phone_number) < 10 {
    return Err(crate::BotError::Validation(
      "Please enter a valid phone number".to_string(),
    ));
  }
  Ok(())
}
