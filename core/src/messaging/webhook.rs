// core/src/messaging/webhook.rs

//! Typed view of the WhatsApp Cloud API webhook body.
//!
//! Every field is optional or defaulted: the provider sends many shapes
//! (status callbacks, media, reactions) and only text-bearing messages matter here.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
  #[serde(default)]
  pub object: Option<String>,
  #[serde(default)]
  pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookChange {
  #[serde(default)]
  pub field: Option<String>,
  #[serde(default)]
  pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
  #[serde(default)]
  pub messaging_product: Option<String>,
  #[serde(default)]
  pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
  #[serde(default)]
  pub from: Option<String>,
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub timestamp: Option<String>,
  #[serde(default, rename = "type")]
  pub kind: Option<String>,
  #[serde(default)]
  pub text: Option<TextContent>,
  #[serde(default)]
  pub interactive: Option<InteractiveContent>,
  #[serde(default)]
  pub button: Option<ButtonContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextContent {
  #[serde(default)]
  pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractiveContent {
  #[serde(default)]
  pub button_reply: Option<ReplyContent>,
  #[serde(default)]
  pub list_reply: Option<ReplyContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyContent {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ButtonContent {
  #[serde(default)]
  pub text: Option<String>,
  #[serde(default)]
  pub payload: Option<String>,
}

/// A sender and the trimmed text they sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
  pub from: String,
  pub text: String,
  pub message_id: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
  value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl InboundMessage {
  /// User text, looked up in order: text body, button reply title, list reply
  /// title, list reply id, quick-reply button text.
  pub fn user_text(&self) -> Option<&str> {
    let interactive = self.interactive.as_ref();
    let list_reply = interactive.and_then(|i| i.list_reply.as_ref());

    non_blank(self.text.as_ref().and_then(|t| t.body.as_ref()))
      .or_else(|| non_blank(interactive.and_then(|i| i.button_reply.as_ref()).and_then(|r| r.title.as_ref())))
      .or_else(|| non_blank(list_reply.and_then(|r| r.title.as_ref())))
      .or_else(|| non_blank(list_reply.and_then(|r| r.id.as_ref())))
      .or_else(|| non_blank(self.button.as_ref().and_then(|b| b.text.as_ref())))
  }

  /// `None` when the message has no sender or no usable text.
  pub fn to_inbound_text(&self) -> Option<InboundText> {
    let from = non_blank(self.from.as_ref())?;
    let text = self.user_text()?;
    Some(InboundText {
      from: from.to_string(),
      text: text.to_string(),
      message_id: self.id.clone(),
    })
  }
}

impl WebhookPayload {
  /// All text-bearing messages across `entry[].changes[].value.messages[]`.
  pub fn inbound_texts(&self) -> Vec<InboundText> {
    self
      .entry
      .iter()
      .flat_map(|entry| entry.changes.iter())
      .flat_map(|change| change.value.messages.iter())
      .filter_map(InboundMessage::to_inbound_text)
      .collect()
  }
}
