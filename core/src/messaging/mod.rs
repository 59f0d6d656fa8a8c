// core/src/messaging/mod.rs

//! Inbound webhook payload types and the outbound `Messenger` seam.

pub mod recording;
pub mod webhook;

pub use recording::{RecordingMessenger, SentMessage};
pub use webhook::{InboundText, WebhookPayload};

use crate::error::BotResult;
use async_trait::async_trait;
use std::sync::Arc;

pub type SharedMessenger = Arc<dyn Messenger>;

/// Sends a plain-text chat message to a phone number.
#[async_trait]
pub trait Messenger: Send + Sync {
  /// Returns `BotError::Transport` when the provider is unreachable,
  /// unconfigured, or rejects the message.
  async fn send_text(&self, to: &str, body: &str) -> BotResult<()>;
}
