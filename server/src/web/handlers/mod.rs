// src/web/handlers/mod.rs

pub mod catalog_handlers;
pub mod health_handlers;
pub mod order_handlers;
pub mod report_handlers;
pub mod simulation_handlers;
pub mod webhook_handlers;

use crate::errors::AppError;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Blank query values count as absent.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parses an optional `YYYY-MM-DD` query value.
pub(crate) fn parse_date(field: &str, value: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
  non_blank(value)
    .map(|raw| {
      NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} '{}'. Expected YYYY-MM-DD", field, raw)))
    })
    .transpose()
}

/// Optional JSON body: an empty body yields the defaults, a malformed one is rejected.
pub(crate) fn json_or_default<T: DeserializeOwned + Default>(raw: &[u8]) -> Result<T, AppError> {
  if raw.iter().all(u8::is_ascii_whitespace) {
    return Ok(T::default());
  }
  serde_json::from_slice(raw).map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Default, serde::Deserialize)]
  struct Body {
    reason: Option<String>,
  }

  #[test]
  fn empty_body_falls_back_to_defaults() {
    let body: Body = json_or_default(b"").unwrap();
    assert!(body.reason.is_none());
    let body: Body = json_or_default(b"  \n").unwrap();
    assert!(body.reason.is_none());
  }

  #[test]
  fn malformed_body_is_a_validation_error() {
    let err = json_or_default::<Body>(br#"{"reason": 5}"#).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("Invalid JSON body")));
    let body: Body = json_or_default(br#"{"reason":"late"}"#).unwrap();
    assert_eq!(body.reason.as_deref(), Some("late"));
  }
}
