// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Broad classification of a `BotError`, used by the HTTP layer to choose a
/// status code and by callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Validation,
  BusinessRule,
  Transport,
  Internal,
}

#[derive(Debug, Error)]
pub enum BotError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Validation(String),

  #[error("Insufficient stock for {variant_id}. Available: {available}, Required: {requested}")]
  InsufficientStock {
    variant_id: String,
    available: i32,
    requested: i32,
  },

  #[error("Product variant '{0}' is not available")]
  VariantUnavailable(String),

  #[error("Cannot modify order {order_id} with status: {status}")]
  OrderClosed { order_id: String, status: String },

  #[error("Concurrent modification: {0}")]
  Conflict(String),

  #[error("Messaging transport error: {0}")]
  Transport(String),

  #[error("Record store error. Source: {source}")]
  Store {
    #[source]
    source: AnyhowError,
  },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl BotError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      BotError::NotFound(_) => ErrorKind::NotFound,
      BotError::Validation(_) => ErrorKind::Validation,
      BotError::InsufficientStock { .. }
      | BotError::VariantUnavailable(_)
      | BotError::OrderClosed { .. }
      | BotError::Conflict(_) => ErrorKind::BusinessRule,
      BotError::Transport(_) => ErrorKind::Transport,
      BotError::Store { .. } | BotError::HandlerMissing { .. } | BotError::Internal(_) => ErrorKind::Internal,
    }
  }

  /// Shorthand for wrapping a driver error (sqlx, io, ...) as a store failure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    BotError::Store {
      source: AnyhowError::new(err),
    }
  }
}

impl From<AnyhowError> for BotError {
  fn from(err: AnyhowError) -> Self {
    BotError::Store { source: err }
  }
}

pub type BotResult<T, E = BotError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insufficient_stock_message_reports_available_quantity() {
    let err = BotError::InsufficientStock {
      variant_id: "Pizza Margherita - Large".to_string(),
      available: 3,
      requested: 5,
    };
    assert_eq!(
      err.to_string(),
      "Insufficient stock for Pizza Margherita - Large. Available: 3, Required: 5"
    );
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
  }

  #[test]
  fn store_errors_are_internal() {
    let err = BotError::from(anyhow::anyhow!("connection reset"));
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().contains("connection reset"));
  }
}
