// core/src/messaging/recording.rs

use crate::error::{BotError, BotResult};
use crate::messaging::Messenger;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessage {
  pub to: String,
  pub body: String,
}

/// In-process `Messenger` that keeps every outgoing message.
///
/// Backs the conversation simulation endpoint and the test suites. It can be
/// switched into a failing mode to exercise best-effort delivery paths.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
  sent: Mutex<Vec<SentMessage>>,
  failing: AtomicBool,
}

impl RecordingMessenger {
  pub fn new() -> Self {
    Self::default()
  }

  /// A messenger whose every send fails with a transport error.
  pub fn failing() -> Self {
    let messenger = Self::default();
    messenger.set_failing(true);
    messenger
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn sent(&self) -> Vec<SentMessage> {
    self.sent.lock().clone()
  }

  pub fn sent_to(&self, phone_number: &str) -> Vec<String> {
    self
      .sent
      .lock()
      .iter()
      .filter(|m| m.to == phone_number)
      .map(|m| m.body.clone())
      .collect()
  }

  pub fn last_body(&self) -> Option<String> {
    self.sent.lock().last().map(|m| m.body.clone())
  }

  pub fn clear(&self) {
    self.sent.lock().clear();
  }
}

#[async_trait]
impl Messenger for RecordingMessenger {
  async fn send_text(&self, to: &str, body: &str) -> BotResult<()> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(BotError::Transport("recording messenger set to fail".to_string()));
    }
    self.sent.lock().push(SentMessage {
      to: to.to_string(),
      body: body.to_string(),
    });
    Ok(())
  }
}
