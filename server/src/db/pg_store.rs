// src/db/pg_store.rs

use async_trait::async_trait;
use chrono::Utc;
use orderbot::models::{format_order_id, NewCustomer};
use orderbot::store::{OrderQuery, OrderTransition, RecordStore, StockEffect, VariantFilter};
use orderbot::{BotError, BotResult, Customer, NewOrder, Order, OrderComment, ProductVariant, Session};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::models::customer_row::CustomerRow;
use crate::models::order_row::{CommentRow, OrderRow, ORDER_COLUMNS};
use crate::models::session_row::{SessionRow, SESSION_COLUMNS};
use crate::models::variant_row::{VariantRow, VARIANT_COLUMNS};

fn db_err(err: sqlx::Error) -> BotError {
  BotError::store(err)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// `RecordStore` over Postgres. Stock-affecting writes run inside one transaction.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

/// Conditional decrement. On failure, works out why so the caller gets the precise error.
async fn reserve_stock(conn: &mut PgConnection, variant_id: &str, quantity: i32) -> BotResult<()> {
  let updated = sqlx::query(
    "UPDATE product_variants SET stock_quantity = stock_quantity - $2 \
     WHERE id = $1 AND is_available AND stock_quantity >= $2",
  )
  .bind(variant_id)
  .bind(quantity)
  .execute(&mut *conn)
  .await
  .map_err(db_err)?;

  if updated.rows_affected() == 1 {
    return Ok(());
  }

  let current = sqlx::query_as::<_, VariantRow>(&format!(
    "SELECT {} FROM product_variants WHERE id = $1",
    VARIANT_COLUMNS
  ))
  .bind(variant_id)
  .fetch_optional(&mut *conn)
  .await
  .map_err(db_err)?;

  match current {
    None => Err(BotError::NotFound(format!("Product variant {} not found.", variant_id))),
    Some(row) if !row.is_available => Err(BotError::VariantUnavailable(variant_id.to_string())),
    Some(row) => Err(BotError::InsufficientStock {
      variant_id: variant_id.to_string(),
      available: row.stock_quantity,
      requested: quantity,
    }),
  }
}

async fn release_stock(conn: &mut PgConnection, variant_id: &str, quantity: i32) -> BotResult<()> {
  sqlx::query("UPDATE product_variants SET stock_quantity = stock_quantity + $2 WHERE id = $1")
    .bind(variant_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await
    .map_err(db_err)?;
  Ok(())
}

#[async_trait]
impl RecordStore for PgStore {
  async fn list_variants(&self, filter: &VariantFilter) -> BotResult<Vec<ProductVariant>> {
    let rows = sqlx::query_as::<_, VariantRow>(&format!(
      "SELECT {} FROM product_variants \
       WHERE ($1 = FALSE OR is_available) \
         AND ($2::TEXT IS NULL OR strpos(lower(product_name), lower($2)) > 0) \
       ORDER BY product_name, variant_name",
      VARIANT_COLUMNS
    ))
    .bind(filter.available_only)
    .bind(filter.product_name.as_deref())
    .fetch_all(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(rows.into_iter().map(ProductVariant::from).collect())
  }

  async fn get_variant(&self, variant_id: &str) -> BotResult<Option<ProductVariant>> {
    let row = sqlx::query_as::<_, VariantRow>(&format!(
      "SELECT {} FROM product_variants WHERE id = $1",
      VARIANT_COLUMNS
    ))
    .bind(variant_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(row.map(ProductVariant::from))
  }

  #[instrument(name = "PgStore::upsert_variant", skip(self, variant), fields(variant_id = %variant.id))]
  async fn upsert_variant(&self, variant: &ProductVariant) -> BotResult<()> {
    variant.validate()?;
    sqlx::query(
      "INSERT INTO product_variants \
         (id, product_name, variant_name, variant_type, unit_price_cents, currency, stock_quantity, is_available, description) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
       ON CONFLICT (id) DO UPDATE SET \
         product_name = EXCLUDED.product_name, variant_name = EXCLUDED.variant_name, \
         variant_type = EXCLUDED.variant_type, unit_price_cents = EXCLUDED.unit_price_cents, \
         currency = EXCLUDED.currency, stock_quantity = EXCLUDED.stock_quantity, \
         is_available = EXCLUDED.is_available, description = EXCLUDED.description",
    )
    .bind(&variant.id)
    .bind(&variant.product_name)
    .bind(&variant.variant_name)
    .bind(variant.variant_type.as_deref())
    .bind(variant.unit_price_cents)
    .bind(&variant.currency)
    .bind(variant.stock_quantity)
    .bind(variant.is_available)
    .bind(variant.description.as_deref())
    .execute(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(())
  }

  async fn find_active_session(&self, phone_number: &str) -> BotResult<Option<Session>> {
    let row = sqlx::query_as::<_, SessionRow>(&format!(
      "SELECT {} FROM chat_sessions WHERE phone_number = $1 AND status = 'active'",
      SESSION_COLUMNS
    ))
    .bind(phone_number)
    .fetch_optional(&self.pool)
    .await
    .map_err(db_err)?;
    row.map(Session::try_from).transpose()
  }

  async fn insert_session(&self, session: &Session) -> BotResult<()> {
    let result = sqlx::query(&format!(
      "INSERT INTO chat_sessions ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
      SESSION_COLUMNS
    ))
    .bind(session.id)
    .bind(&session.phone_number)
    .bind(session.status.as_str())
    .bind(session.step.as_str())
    .bind(session.selected_variant_id.as_deref())
    .bind(session.item_name.as_deref())
    .bind(session.unit_price_cents)
    .bind(session.currency.as_deref())
    .bind(session.quantity)
    .bind(session.delivery_address.as_deref())
    .bind(session.order_id.as_deref())
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => Ok(()),
      Err(e) if is_unique_violation(&e) => Err(BotError::Conflict(format!(
        "Phone number {} already has an active session",
        session.phone_number
      ))),
      Err(e) => Err(db_err(e)),
    }
  }

  async fn update_session(&self, session: &Session) -> BotResult<()> {
    let updated = sqlx::query(
      "UPDATE chat_sessions SET status = $2, current_step = $3, selected_variant_id = $4, item_name = $5, \
         unit_price_cents = $6, currency = $7, quantity = $8, delivery_address = $9, order_id = $10, updated_at = $11 \
       WHERE id = $1",
    )
    .bind(session.id)
    .bind(session.status.as_str())
    .bind(session.step.as_str())
    .bind(session.selected_variant_id.as_deref())
    .bind(session.item_name.as_deref())
    .bind(session.unit_price_cents)
    .bind(session.currency.as_deref())
    .bind(session.quantity)
    .bind(session.delivery_address.as_deref())
    .bind(session.order_id.as_deref())
    .bind(session.updated_at)
    .execute(&self.pool)
    .await
    .map_err(db_err)?;

    if updated.rows_affected() == 0 {
      return Err(BotError::NotFound(format!("Session {} not found", session.id)));
    }
    Ok(())
  }

  async fn find_customer_by_phone(&self, phone_number: &str) -> BotResult<Option<Customer>> {
    let row = sqlx::query_as::<_, CustomerRow>(
      "SELECT id, name, phone_number, address, created_at FROM customers WHERE phone_number = $1",
    )
    .bind(phone_number)
    .fetch_optional(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(row.map(Customer::from))
  }

  async fn insert_customer(&self, customer: NewCustomer) -> BotResult<Customer> {
    let result = sqlx::query_as::<_, CustomerRow>(
      "INSERT INTO customers (id, name, phone_number, address, created_at) VALUES ($1, $2, $3, $4, $5) \
       RETURNING id, name, phone_number, address, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&customer.name)
    .bind(&customer.phone_number)
    .bind(customer.address.as_deref())
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => Ok(Customer::from(row)),
      Err(e) if is_unique_violation(&e) => Err(BotError::Conflict(format!(
        "Customer with phone number {} already exists",
        customer.phone_number
      ))),
      Err(e) => Err(db_err(e)),
    }
  }

  #[instrument(name = "PgStore::place_order", skip(self, new_order), fields(variant_id = ?new_order.variant_id, quantity = new_order.quantity))]
  async fn place_order(&self, new_order: NewOrder, reserve: bool) -> BotResult<Order> {
    let mut tx = self.pool.begin().await.map_err(db_err)?;

    let reserved = match (&new_order.variant_id, reserve) {
      (Some(variant_id), true) => {
        reserve_stock(&mut *tx, variant_id, new_order.quantity).await?;
        true
      }
      _ => false,
    };

    let sequence = sqlx::query_scalar::<_, i64>("SELECT nextval('order_number_seq')")
      .fetch_one(&mut *tx)
      .await
      .map_err(db_err)?;
    let order = Order::from_new(format_order_id(new_order.created_at, sequence as u64), new_order, reserved);

    sqlx::query(&format!(
      "INSERT INTO orders ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
      ORDER_COLUMNS
    ))
    .bind(&order.id)
    .bind(&order.customer_name)
    .bind(&order.phone_number)
    .bind(&order.item)
    .bind(order.variant_id.as_deref())
    .bind(order.variant_name.as_deref())
    .bind(order.quantity)
    .bind(order.unit_price_cents)
    .bind(&order.currency)
    .bind(order.total_price_cents)
    .bind(&order.delivery_address)
    .bind(order.status.as_str())
    .bind(order.stock_reserved)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;
    Ok(order)
  }

  async fn get_order(&self, order_id: &str) -> BotResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(order_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(db_err)?;
    row.map(Order::try_from).transpose()
  }

  async fn query_orders(&self, query: &OrderQuery) -> BotResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
      "SELECT {} FROM orders \
       WHERE ($1::TEXT IS NULL OR phone_number = $1) \
         AND ($2::TEXT IS NULL OR strpos(lower(customer_name), lower($2)) > 0) \
         AND ($3::TEXT IS NULL OR status = $3) \
         AND ($4::TEXT IS NULL \
              OR strpos(lower(id), lower($4)) > 0 \
              OR strpos(lower(customer_name), lower($4)) > 0 \
              OR strpos(lower(item), lower($4)) > 0) \
         AND ($5::TIMESTAMPTZ IS NULL OR created_at >= $5) \
         AND ($6::TIMESTAMPTZ IS NULL OR created_at < $6) \
       ORDER BY created_at DESC, id DESC \
       LIMIT $7",
      ORDER_COLUMNS
    ))
    .bind(query.phone_number.as_deref())
    .bind(query.name_contains.as_deref())
    .bind(query.status.map(|s| s.as_str()))
    .bind(query.text.as_deref())
    .bind(query.created_from)
    .bind(query.created_to)
    .bind(query.limit.map(|l| l as i64))
    .fetch_all(&self.pool)
    .await
    .map_err(db_err)?;
    rows.into_iter().map(Order::try_from).collect()
  }

  #[instrument(name = "PgStore::transition_order", skip(self, transition), fields(order_id = %transition.order_id, new_status = %transition.new_status))]
  async fn transition_order(&self, transition: OrderTransition) -> BotResult<Order> {
    let mut tx = self.pool.begin().await.map_err(db_err)?;

    let current: Order = sqlx::query_as::<_, OrderRow>(&format!(
      "SELECT {} FROM orders WHERE id = $1 FOR UPDATE",
      ORDER_COLUMNS
    ))
    .bind(&transition.order_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| BotError::NotFound(format!("Order {} not found", transition.order_id)))?
    .try_into()?;

    if current.status != transition.expected_status {
      return Err(BotError::Conflict(format!(
        "Order {} changed status to {} concurrently",
        current.id, current.status
      )));
    }

    let mut stock_reserved = current.stock_reserved;
    match (transition.stock_effect, current.variant_id.as_deref()) {
      (StockEffect::Reserve, Some(variant_id)) if !current.stock_reserved => {
        reserve_stock(&mut *tx, variant_id, current.quantity).await?;
        stock_reserved = true;
      }
      (StockEffect::Release, Some(variant_id)) if current.stock_reserved => {
        release_stock(&mut *tx, variant_id, current.quantity).await?;
        stock_reserved = false;
      }
      _ => {}
    }

    let updated: Order = sqlx::query_as::<_, OrderRow>(&format!(
      "UPDATE orders SET status = $2, stock_reserved = $3, updated_at = $4 WHERE id = $1 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(&transition.order_id)
    .bind(transition.new_status.as_str())
    .bind(stock_reserved)
    .bind(transition.at)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?
    .try_into()?;

    sqlx::query("INSERT INTO order_comments (id, order_id, body, created_at) VALUES ($1, $2, $3, $4)")
      .bind(Uuid::new_v4())
      .bind(&transition.order_id)
      .bind(&transition.comment)
      .bind(transition.at)
      .execute(&mut *tx)
      .await
      .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;
    Ok(updated)
  }

  async fn order_comments(&self, order_id: &str) -> BotResult<Vec<OrderComment>> {
    let rows = sqlx::query_as::<_, CommentRow>(
      "SELECT id, order_id, body, created_at FROM order_comments WHERE order_id = $1 ORDER BY created_at, id",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(rows.into_iter().map(OrderComment::from).collect())
  }
}
