// src/web/envelope.rs

//! `{status, message, ...payload}` response bodies. Errors use the same shape
//! through `AppError`'s `ResponseError` impl.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::{json, Map, Value};

pub fn success(message: impl Into<String>, payload: Value) -> HttpResponse {
  respond(StatusCode::OK, message, payload)
}

pub fn created(message: impl Into<String>, payload: Value) -> HttpResponse {
  respond(StatusCode::CREATED, message, payload)
}

fn respond(status: StatusCode, message: impl Into<String>, payload: Value) -> HttpResponse {
  HttpResponse::build(status).json(body("success", message.into(), payload))
}

/// Payload objects are flattened into the envelope; any other value lands under `data`.
pub fn body(status: &str, message: String, payload: Value) -> Value {
  let mut envelope = Map::new();
  envelope.insert("status".to_string(), json!(status));
  envelope.insert("message".to_string(), json!(message));
  match payload {
    Value::Object(fields) => {
      for (key, value) in fields {
        if key != "status" && key != "message" {
          envelope.insert(key, value);
        }
      }
    }
    Value::Null => {}
    other => {
      envelope.insert("data".to_string(), other);
    }
  }
  Value::Object(envelope)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn object_payload_is_flattened() {
    let value = body("success", "ok".to_string(), json!({ "order_id": "WOR-2026-00001", "status": "ignored" }));
    assert_eq!(
      value,
      json!({ "status": "success", "message": "ok", "order_id": "WOR-2026-00001" })
    );
  }

  #[test]
  fn non_object_payload_goes_under_data() {
    let value = body("success", "ok".to_string(), json!([1, 2]));
    assert_eq!(value["data"], json!([1, 2]));
  }
}
