// src/models/mod.rs

//! Postgres row shapes. Each converts into the matching `orderbot` model.

pub mod customer_row;
pub mod order_row;
pub mod session_row;
pub mod variant_row;

pub use customer_row::CustomerRow;
pub use order_row::{CommentRow, OrderRow};
pub use session_row::SessionRow;
pub use variant_row::VariantRow;
