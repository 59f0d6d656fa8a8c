// src/web/handlers/simulation_handlers.rs

use actix_web::{web, HttpResponse};
use orderbot::{OrderBot, RecordingMessenger};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::envelope;

pub const SIMULATED_PHONE: &str = "254700000000";
pub const SIMULATED_SCRIPT: [&str; 5] = ["order", "1", "2", "123 Main Street, Nairobi", "yes"];

#[derive(Debug, Serialize)]
struct TranscriptLine {
  from: &'static str,
  text: String,
}

/// Runs a scripted chat through the real conversation flow against the live
/// store. Replies go to an in-process recording messenger, not the provider.
#[instrument(name = "handler::simulate_conversation", skip(app_state))]
pub async fn simulate_conversation_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let messenger = Arc::new(RecordingMessenger::new());
  let bot = OrderBot::new(
    app_state.bot.store.clone(),
    messenger.clone(),
    &app_state.config.default_currency,
  );

  let mut transcript = Vec::new();
  let mut order_created = None;
  for text in SIMULATED_SCRIPT {
    transcript.push(TranscriptLine {
      from: "user",
      text: text.to_string(),
    });
    let outcome = bot.conversations.handle_message(SIMULATED_PHONE, text).await?;
    transcript.push(TranscriptLine {
      from: "bot",
      text: outcome.reply,
    });
    if let Some(order) = outcome.placed_order {
      order_created = Some(order.id);
    }
  }

  let message = match &order_created {
    Some(order_id) => {
      info!(order_id = %order_id, "Simulated conversation placed an order.");
      "WhatsApp conversation simulated successfully!".to_string()
    }
    None => "Conversation simulated; no order was placed.".to_string(),
  };
  Ok(envelope::success(
    message,
    json!({
      "order_created": order_created,
      "conversation": transcript,
      "messages_sent": messenger.sent().len(),
    }),
  ))
}
