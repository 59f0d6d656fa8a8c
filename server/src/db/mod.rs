// src/db/mod.rs

pub mod pg_store;

pub use pg_store::PgStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::errors::Result;

/// Connects and brings the schema up to date.
pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool> {
  let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
  tracing::info!("Successfully connected to the database.");
  sqlx::migrate!("./migrations").run(&pool).await?;
  tracing::info!("Database migrations applied.");
  Ok(pool)
}
