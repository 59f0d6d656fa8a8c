// src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines::{build_webhook_pipeline, WebhookCtxData};
use orderbot::{OrderBot, Pipeline, SharedMessenger, SharedStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub bot: OrderBot,
  pub config: Arc<AppConfig>,
  pub webhook_pipeline: Arc<Pipeline<WebhookCtxData, AppError>>,
}

impl AppState {
  pub fn new(store: SharedStore, messenger: SharedMessenger, config: Arc<AppConfig>) -> Self {
    let bot = OrderBot::new(store, messenger, &config.default_currency);
    let webhook_pipeline = Arc::new(build_webhook_pipeline(bot.clone()));
    Self {
      bot,
      config,
      webhook_pipeline,
    }
  }
}
