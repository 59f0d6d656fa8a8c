// src/web/handlers/report_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::parse_date;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::envelope;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
  pub date: Option<String>,
}

/// Defaults to today (UTC).
#[instrument(name = "handler::daily_summary", skip(app_state, query))]
pub async fn daily_summary_handler(
  app_state: web::Data<AppState>,
  query: web::Query<DailyQuery>,
) -> Result<HttpResponse, AppError> {
  let date = parse_date("date", &query.date)?.unwrap_or_else(|| Utc::now().date_naive());
  let summary = app_state.bot.reports.daily_summary(date).await?;
  Ok(envelope::success(
    format!("Daily summary for {}", date),
    json!({ "summary": summary }),
  ))
}
