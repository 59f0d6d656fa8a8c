// src/services/mod.rs
pub mod whatsapp;

pub use whatsapp::WhatsAppClient;
