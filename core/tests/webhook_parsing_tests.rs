// tests/webhook_parsing_tests.rs
mod common;

use common::*;
use orderbot::WebhookPayload;
use serde_json::json;

fn payload(messages: serde_json::Value) -> WebhookPayload {
  serde_json::from_value(json!({
    "object": "whatsapp_business_account",
    "entry": [{
      "id": "1234",
      "changes": [{
        "field": "messages",
        "value": { "messaging_product": "whatsapp", "messages": messages }
      }]
    }]
  }))
  .unwrap()
}

#[test]
fn test_extracts_plain_text_messages() {
  setup_tracing();
  let p = payload(json!([
    { "from": "254700000001", "id": "wamid.1", "type": "text", "text": { "body": "  order " } }
  ]));
  let texts = p.inbound_texts();
  assert_eq!(texts.len(), 1);
  assert_eq!(texts[0].from, "254700000001");
  assert_eq!(texts[0].text, "order");
  assert_eq!(texts[0].message_id.as_deref(), Some("wamid.1"));
}

#[test]
fn test_extracts_interactive_and_button_replies() {
  setup_tracing();
  let p = payload(json!([
    { "from": "254700000001", "type": "interactive",
      "interactive": { "type": "button_reply", "button_reply": { "id": "yes_btn", "title": "Yes" } } },
    { "from": "254700000002", "type": "interactive",
      "interactive": { "type": "list_reply", "list_reply": { "id": "row-3", "title": "Coca Cola - Small" } } },
    { "from": "254700000003", "type": "interactive",
      "interactive": { "type": "list_reply", "list_reply": { "id": "3" } } },
    { "from": "254700000004", "type": "button", "button": { "text": "menu", "payload": "MENU" } }
  ]));
  let texts: Vec<String> = p.inbound_texts().into_iter().map(|t| t.text).collect();
  assert_eq!(texts, vec!["Yes", "Coca Cola - Small", "3", "menu"]);
}

#[test]
fn test_skips_messages_without_sender_or_text() {
  setup_tracing();
  let p = payload(json!([
    { "type": "text", "text": { "body": "no sender" } },
    { "from": "254700000001", "type": "image", "image": { "id": "media-1" } },
    { "from": "254700000001", "type": "text", "text": { "body": "   " } }
  ]));
  assert!(p.inbound_texts().is_empty());
}

#[test]
fn test_status_callbacks_carry_no_messages() {
  setup_tracing();
  let p: WebhookPayload = serde_json::from_value(json!({
    "object": "whatsapp_business_account",
    "entry": [{ "changes": [{ "value": { "statuses": [{ "id": "wamid.9", "status": "delivered" }] } }] }]
  }))
  .unwrap();
  assert!(p.inbound_texts().is_empty());
}
