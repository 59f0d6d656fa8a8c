// src/services/whatsapp.rs
use crate::config::WhatsAppConfig;
use async_trait::async_trait;
use orderbot::{BotError, BotResult, Messenger};
use serde::Serialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize)]
struct TextBody<'a> {
  body: &'a str,
}

#[derive(Debug, Serialize)]
struct OutboundText<'a> {
  messaging_product: &'static str,
  to: &'a str,
  #[serde(rename = "type")]
  kind: &'static str,
  text: TextBody<'a>,
}

/// `Messenger` backed by the WhatsApp Cloud API. Sends are never retried.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
  http: reqwest::Client,
  config: WhatsAppConfig,
}

impl WhatsAppClient {
  pub fn new(config: WhatsAppConfig) -> Result<Self, reqwest::Error> {
    let http = reqwest::Client::builder().timeout(config.timeout).build()?;
    Ok(Self { http, config })
  }

  fn messages_url(&self, phone_number_id: &str) -> String {
    format!("{}/{}/messages", self.config.api_base.trim_end_matches('/'), phone_number_id)
  }
}

#[async_trait]
impl Messenger for WhatsAppClient {
  #[instrument(name = "WhatsAppClient::send_text", skip(self, body), fields(to = %to))]
  async fn send_text(&self, to: &str, body: &str) -> BotResult<()> {
    let (Some(token), Some(phone_number_id)) = (&self.config.access_token, &self.config.phone_number_id) else {
      warn!("WhatsApp credentials are not configured; message not sent.");
      return Err(BotError::Transport("WhatsApp credentials not configured".to_string()));
    };

    let payload = OutboundText {
      messaging_product: "whatsapp",
      to,
      kind: "text",
      text: TextBody { body },
    };

    let response = self
      .http
      .post(self.messages_url(phone_number_id))
      .bearer_auth(token)
      .json(&payload)
      .send()
      .await
      .map_err(|e| BotError::Transport(format!("WhatsApp request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      warn!(%status, detail = %detail, "WhatsApp API rejected the message.");
      return Err(BotError::Transport(format!("WhatsApp API returned {}", status)));
    }

    info!("WhatsApp message sent.");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn outbound_payload_matches_cloud_api_shape() {
    let payload = OutboundText {
      messaging_product: "whatsapp",
      to: "254700000001",
      kind: "text",
      text: TextBody { body: "Hello" },
    };
    assert_eq!(
      serde_json::to_value(&payload).unwrap(),
      serde_json::json!({
        "messaging_product": "whatsapp",
        "to": "254700000001",
        "type": "text",
        "text": { "body": "Hello" }
      })
    );
  }

  #[test]
  fn messages_url_joins_base_and_phone_number_id() {
    let client = WhatsAppClient::new(WhatsAppConfig {
      api_base: "https://graph.example.test/v17.0/".to_string(),
      ..WhatsAppConfig::default()
    })
    .unwrap();
    assert_eq!(client.messages_url("1234"), "https://graph.example.test/v17.0/1234/messages");
  }

  #[tokio::test]
  async fn missing_credentials_is_a_transport_error() {
    let client = WhatsAppClient::new(WhatsAppConfig::default()).unwrap();
    let err = client.send_text("254700000001", "hi").await.unwrap_err();
    assert!(matches!(err, BotError::Transport(_)));
  }
}
