// core/src/conversation/mod.rs

//! The chat ordering flow: a pure state machine plus the service that runs it
//! against the store and the messenger.

pub mod machine;
pub mod replies;
pub mod service;

pub use machine::{advance, match_menu_item, order_failed, order_placed, PlaceOrder, Transition};
pub use service::{ConversationService, InboundContext, MessageOutcome};
