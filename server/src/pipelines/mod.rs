// src/pipelines/mod.rs

//! Server-side pipelines. The order and conversation pipelines live in the
//! `orderbot` core; this module adds the webhook intake on top of them.

pub mod contexts;
pub mod webhook_pipeline;

pub use contexts::WebhookCtxData;
pub use webhook_pipeline::build_webhook_pipeline;
