// core/src/conversation/service.rs

use crate::catalog::{Catalog, MenuItem};
use crate::conversation::machine::{self, Transition};
use crate::error::{BotError, BotResult};
use crate::messaging::SharedMessenger;
use crate::models::{Order, Session};
use crate::orders::OrderManager;
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use crate::store::SharedStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// State carried through one inbound message.
#[derive(Debug)]
pub struct InboundContext {
  pub phone_number: String,
  pub text: String,
  pub received_at: DateTime<Utc>,
  pub session: Option<Session>,
  pub menu: Vec<MenuItem>,
  pub reply: Option<String>,
  pub placed_order: Option<Order>,
  pub reply_delivered: bool,
}

impl InboundContext {
  fn new(phone_number: &str, text: &str, received_at: DateTime<Utc>) -> Self {
    Self {
      phone_number: phone_number.to_string(),
      text: text.to_string(),
      received_at,
      session: None,
      menu: Vec::new(),
      reply: None,
      placed_order: None,
      reply_delivered: false,
    }
  }
}

/// What handling one message produced.
#[derive(Debug, Clone, Serialize)]
pub struct MessageOutcome {
  pub session: Session,
  pub reply: String,
  pub placed_order: Option<Order>,
  pub reply_delivered: bool,
}

/// Drives chat conversations: one call per inbound message.
#[derive(Clone)]
pub struct ConversationService {
  pipeline: Arc<Pipeline<InboundContext>>,
}

impl ConversationService {
  pub fn new(store: SharedStore, catalog: Catalog, orders: OrderManager, messenger: SharedMessenger) -> Self {
    Self {
      pipeline: Arc::new(build_inbound_pipeline(store, catalog, orders, messenger)),
    }
  }

  /// Loads (or opens) the sender's session, advances it, saves it and replies.
  ///
  /// Reply delivery is best effort; a failed send is logged and reported in
  /// the outcome, never returned as an error.
  #[instrument(name = "ConversationService::handle_message", skip(self, text), err(Display))]
  pub async fn handle_message(&self, phone_number: &str, text: &str) -> BotResult<MessageOutcome> {
    self.handle_message_at(phone_number, text, Utc::now()).await
  }

  pub async fn handle_message_at(
    &self,
    phone_number: &str,
    text: &str,
    received_at: DateTime<Utc>,
  ) -> BotResult<MessageOutcome> {
    let ctx = ContextData::new(InboundContext::new(phone_number, text, received_at));
    self.pipeline.run(ctx.clone()).await?;

    let mut guard = ctx.write();
    let session = guard
      .session
      .take()
      .ok_or_else(|| BotError::Internal("Conversation finished without a session".to_string()))?;
    Ok(MessageOutcome {
      session,
      reply: guard.reply.take().unwrap_or_default(),
      placed_order: guard.placed_order.take(),
      reply_delivered: guard.reply_delivered,
    })
  }
}

fn build_inbound_pipeline(
  store: SharedStore,
  catalog: Catalog,
  orders: OrderManager,
  messenger: SharedMessenger,
) -> Pipeline<InboundContext> {
  let mut pipeline = Pipeline::new(
    "inbound_message",
    &[
      ("load_session", false, None),
      ("advance_conversation", false, None),
      ("persist_session", false, None),
      ("send_reply", false, None),
    ],
  );

  let load_store = store.clone();
  pipeline.on_root("load_session", move |ctx: ContextData<InboundContext>| {
    let store = load_store.clone();
    async move {
      let (phone_number, now) = {
        let guard = ctx.read();
        (guard.phone_number.clone(), guard.received_at)
      };
      let session = match store.find_active_session(&phone_number).await? {
        Some(existing) => existing,
        None => {
          let fresh = Session::new(&phone_number, now);
          match store.insert_session(&fresh).await {
            Ok(()) => {
              info!(phone_number = %phone_number, session_id = %fresh.id, "Opened conversation session.");
              fresh
            }
            Err(BotError::Conflict(_)) => store
              .find_active_session(&phone_number)
              .await?
              .ok_or_else(|| BotError::Internal(format!("Active session for {} vanished", phone_number)))?,
            Err(e) => return Err(e),
          }
        }
      };
      ctx.write().session = Some(session);
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  pipeline.on_root("advance_conversation", move |ctx: ContextData<InboundContext>| {
    let catalog = catalog.clone();
    let orders = orders.clone();
    async move {
      let menu = catalog.chat_menu().await?;
      let Transition { session, reply, action } = {
        let guard = ctx.read();
        let current = guard
          .session
          .as_ref()
          .ok_or_else(|| BotError::Internal("Session not loaded before advance".to_string()))?;
        machine::advance(current, &guard.text, &menu, guard.received_at)
      };

      let (session, reply, placed_order) = match action {
        None => (session, reply.unwrap_or_default(), None),
        Some(place) => match orders.place_from_conversation(&place, session.updated_at).await {
          Ok(order) => {
            let done = machine::order_placed(&session, &order.id, session.updated_at);
            (done.session, done.reply.unwrap_or_default(), Some(order))
          }
          Err(e) => {
            error!(phone_number = %place.phone_number, error = %e, "Failed to place order from conversation.");
            let retry = machine::order_failed(&session, session.updated_at);
            (retry.session, retry.reply.unwrap_or_default(), None)
          }
        },
      };

      let mut guard = ctx.write();
      guard.menu = menu;
      guard.session = Some(session);
      guard.reply = Some(reply);
      guard.placed_order = placed_order;
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  let persist_store = store;
  pipeline.on_root("persist_session", move |ctx: ContextData<InboundContext>| {
    let store = persist_store.clone();
    async move {
      let session = ctx
        .read()
        .session
        .clone()
        .ok_or_else(|| BotError::Internal("Session missing before persist".to_string()))?;
      store.update_session(&session).await?;
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  pipeline.on_root("send_reply", move |ctx: ContextData<InboundContext>| {
    let messenger = messenger.clone();
    async move {
      let (to, body) = {
        let guard = ctx.read();
        (guard.phone_number.clone(), guard.reply.clone().unwrap_or_default())
      };
      if body.is_empty() {
        return Ok::<_, BotError>(PipelineControl::Continue);
      }
      let delivered = match messenger.send_text(&to, &body).await {
        Ok(()) => true,
        Err(e) => {
          warn!(to = %to, error = %e, "Reply not delivered.");
          false
        }
      };
      ctx.write().reply_delivered = delivered;
      Ok(PipelineControl::Continue)
    }
  });

  pipeline
}
