// src/pipelines/contexts.rs

//! Data structs carried through server pipelines inside `orderbot::ContextData`.

use orderbot::{InboundText, WebhookPayload};

/// One webhook POST on its way through intake.
#[derive(Debug, Default)]
pub struct WebhookCtxData {
  pub raw_payload: Vec<u8>,
  pub payload: Option<WebhookPayload>,
  pub messages: Vec<InboundText>,
  pub processed: usize,
  pub failed: usize,
}

impl WebhookCtxData {
  pub fn new(raw_payload: impl Into<Vec<u8>>) -> Self {
    Self {
      raw_payload: raw_payload.into(),
      ..Default::default()
    }
  }
}
