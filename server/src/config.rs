// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_VERIFY_TOKEN: &str = "orderbot_verify_token";
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v17.0";

/// WhatsApp Cloud API credentials and transport settings.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
  pub verify_token: String,
  pub access_token: Option<String>,
  pub phone_number_id: Option<String>,
  pub api_base: String,
  pub timeout: Duration,
}

impl Default for WhatsAppConfig {
  fn default() -> Self {
    Self {
      verify_token: DEFAULT_VERIFY_TOKEN.to_string(),
      access_token: None,
      phone_number_id: None,
      api_base: DEFAULT_API_BASE.to_string(),
      timeout: Duration::from_secs(10),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Absent means the in-memory record store.
  pub database_url: Option<String>,
  pub seed_db: bool,
  pub default_currency: String,
  pub whatsapp: WhatsAppConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      seed_db: false,
      default_currency: "KES".to_string(),
      whatsapp: WhatsAppConfig::default(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };
    let optional = |var_name: &str| get_env(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = optional("DATABASE_URL");

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    let default_currency = get_env("DEFAULT_CURRENCY").unwrap_or_else(|_| "KES".to_string());
    if default_currency.trim().is_empty() {
      return Err(AppError::Config("DEFAULT_CURRENCY must not be empty".to_string()));
    }

    let timeout_secs = get_env("WHATSAPP_TIMEOUT_SECS")
      .unwrap_or_else(|_| "10".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid WHATSAPP_TIMEOUT_SECS: {}", e)))?;
    if timeout_secs == 0 {
      return Err(AppError::Config("WHATSAPP_TIMEOUT_SECS must be positive".to_string()));
    }

    let whatsapp = WhatsAppConfig {
      verify_token: get_env("WHATSAPP_VERIFY_TOKEN").unwrap_or_else(|_| DEFAULT_VERIFY_TOKEN.to_string()),
      access_token: optional("WHATSAPP_TOKEN"),
      phone_number_id: optional("WHATSAPP_PHONE_NUMBER_ID"),
      api_base: get_env("WHATSAPP_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
      timeout: Duration::from_secs(timeout_secs),
    };

    tracing::info!(
      database = database_url.is_some(),
      whatsapp_credentials = whatsapp.access_token.is_some() && whatsapp.phone_number_id.is_some(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      seed_db,
      default_currency,
      whatsapp,
    })
  }
}
