// src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpResponse};
use orderbot::{ContextData, PipelineResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::pipelines::WebhookCtxData;
use crate::state::AppState;

pub const READY_TEXT: &str = "WhatsApp webhook endpoint is ready";

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
  #[serde(rename = "hub.mode")]
  pub mode: Option<String>,
  #[serde(rename = "hub.verify_token")]
  pub verify_token: Option<String>,
  #[serde(rename = "hub.challenge")]
  pub challenge: Option<String>,
}

/// Subscription handshake from the provider.
#[instrument(name = "handler::verify_webhook", skip(app_state, query))]
pub async fn verify_webhook_handler(app_state: web::Data<AppState>, query: web::Query<VerifyQuery>) -> HttpResponse {
  let VerifyQuery {
    mode,
    verify_token,
    challenge,
  } = query.into_inner();

  match (mode, verify_token) {
    (Some(mode), Some(token)) => {
      if mode == "subscribe" && token == app_state.config.whatsapp.verify_token {
        info!("Webhook verification succeeded.");
        HttpResponse::Ok()
          .content_type("text/plain")
          .body(challenge.unwrap_or_default())
      } else {
        warn!(mode = %mode, "Webhook verification token mismatch.");
        HttpResponse::Forbidden().content_type("text/plain").body("Verification token mismatch")
      }
    }
    _ => HttpResponse::Ok().content_type("text/plain").body(READY_TEXT),
  }
}

/// Inbound messages. Always acknowledged so the provider does not redeliver.
#[instrument(name = "handler::receive_webhook", skip(app_state, body), fields(payload_bytes = body.len()))]
pub async fn receive_webhook_handler(app_state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
  let ctx = ContextData::new(WebhookCtxData::new(body.to_vec()));

  match app_state.webhook_pipeline.run(ctx.clone()).await {
    Ok(PipelineResult::Completed) => {
      let guard = ctx.read();
      info!(processed = guard.processed, failed = guard.failed, "Webhook processed.");
    }
    Ok(PipelineResult::Stopped) => info!("Webhook acknowledged without messages to process."),
    Err(e) => error!(error = %e, "Webhook pipeline failed."),
  }

  HttpResponse::Ok().json(json!({ "status": "received" }))
}
