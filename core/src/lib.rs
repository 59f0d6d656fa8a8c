// src/lib.rs

//! Orderbot: a conversational order-taking core.
//!
//! A customer chats with the bot over a messaging provider and is walked
//! through menu selection, quantity, delivery address and confirmation. The
//! confirmed result becomes an order with an audit trail and a stock
//! reservation on the chosen product variant.
//!
//! The crate is organised around:
//!  - `pipeline`: a small async workflow engine (named steps, before/on/after
//!    handlers, `Continue`/`Stop` control, skip conditions).
//!  - `conversation`: the pure session state machine and the service that runs it.
//!  - `orders`: order placement and status changes, both built as pipelines.
//!  - `catalog` and `reports`: read-only views over variants and orders.
//!  - `store`: the `RecordStore` seam with an in-memory implementation.
//!  - `messaging`: webhook payload types and the outbound `Messenger` seam.

pub mod catalog;
pub mod conversation;
pub mod error;
pub mod messaging;
pub mod models;
pub mod orders;
pub mod pipeline;
pub mod reports;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{BotError, BotResult, ErrorKind};
pub use crate::pipeline::{ContextData, Handler, Pipeline, PipelineControl, PipelineResult, StepDef};

pub use crate::catalog::{Catalog, MenuItem, ProductsMenu};
pub use crate::conversation::{ConversationService, MessageOutcome};
pub use crate::messaging::{InboundText, Messenger, RecordingMessenger, SharedMessenger, WebhookPayload};
pub use crate::models::{
  format_money, Customer, NewOrder, Order, OrderComment, OrderStatus, ProductVariant, Session, SessionStatus,
  SessionStep,
};
pub use crate::orders::{OrderManager, OrderRequest, StatusChange};
pub use crate::reports::{DailySummary, Reports, SearchParams};
pub use crate::store::{MemoryStore, OrderQuery, RecordStore, SharedStore, VariantFilter};

/// Every service wired over one store and one messenger.
#[derive(Clone)]
pub struct OrderBot {
  pub store: SharedStore,
  pub messenger: SharedMessenger,
  pub catalog: Catalog,
  pub orders: OrderManager,
  pub reports: Reports,
  pub conversations: ConversationService,
}

impl OrderBot {
  pub fn new(store: SharedStore, messenger: SharedMessenger, default_currency: &str) -> Self {
    let catalog = Catalog::new(store.clone());
    let orders = OrderManager::new(store.clone(), messenger.clone(), default_currency);
    let reports = Reports::new(store.clone());
    let conversations = ConversationService::new(store.clone(), catalog.clone(), orders.clone(), messenger.clone());
    Self {
      store,
      messenger,
      catalog,
      orders,
      reports,
      conversations,
    }
  }
}
