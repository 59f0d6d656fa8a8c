// src/pipelines/webhook_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::WebhookCtxData;
use orderbot::{ContextData, OrderBot, Pipeline, PipelineControl, WebhookPayload};
use tracing::{error, info, warn};

/// parse_payload -> extract_messages -> dispatch_messages.
///
/// None of the steps fail the run: the provider must always get an
/// acknowledgement, so malformed payloads and per-message failures are logged
/// and the pipeline stops or moves on.
pub fn build_webhook_pipeline(bot: OrderBot) -> Pipeline<WebhookCtxData, AppError> {
  let mut p = Pipeline::<WebhookCtxData, AppError>::new(
    "whatsapp_webhook",
    &[
      ("parse_payload", false, None),
      ("extract_messages", false, None),
      ("dispatch_messages", false, None),
    ],
  );

  p.on_root("parse_payload", |ctx_data: ContextData<WebhookCtxData>| async move {
    let parsed = {
      let guard = ctx_data.read();
      serde_json::from_slice::<WebhookPayload>(&guard.raw_payload)
    };
    match parsed {
      Ok(payload) => {
        ctx_data.write().payload = Some(payload);
        Ok::<_, AppError>(PipelineControl::Continue)
      }
      Err(e) => {
        error!(error = %e, "Webhook Pipeline: Failed to parse payload.");
        Ok(PipelineControl::Stop)
      }
    }
  });

  p.on_root("extract_messages", |ctx_data: ContextData<WebhookCtxData>| async move {
    let mut guard = ctx_data.write();
    let messages = guard.payload.as_ref().map(WebhookPayload::inbound_texts).unwrap_or_default();
    if messages.is_empty() {
      info!("Webhook Pipeline: No user messages in payload.");
      return Ok::<_, AppError>(PipelineControl::Stop);
    }
    info!(count = messages.len(), "Webhook Pipeline: Extracted messages.");
    guard.messages = messages;
    Ok(PipelineControl::Continue)
  });

  p.on_root("dispatch_messages", move |ctx_data: ContextData<WebhookCtxData>| {
    let bot = bot.clone();
    async move {
      let messages = ctx_data.read().messages.clone();
      for message in messages {
        match bot.conversations.handle_message(&message.from, &message.text).await {
          Ok(outcome) => {
            info!(
              from = %message.from,
              step = %outcome.session.step.as_str(),
              reply_delivered = outcome.reply_delivered,
              "Webhook Pipeline: Message handled."
            );
            ctx_data.write().processed += 1;
          }
          Err(e) => {
            warn!(from = %message.from, error = %e, "Webhook Pipeline: Failed to handle message.");
            ctx_data.write().failed += 1;
          }
        }
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    }
  });

  p
}
