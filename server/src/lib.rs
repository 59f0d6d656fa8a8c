// src/lib.rs

//! HTTP surface of the order bot: WhatsApp webhook intake, order and catalog
//! endpoints, reports, and the Postgres record store.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
