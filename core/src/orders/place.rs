// core/src/orders/place.rs

//! Order placement pipeline:
//! `validate_request` -> `resolve_variant` -> `ensure_customer` -> `persist_order`.

use crate::error::{BotError, BotResult};
use crate::models::{validate_phone_number, Customer, NewCustomer, NewOrder, Order, ProductVariant};
use crate::pipeline::{ContextData, Pipeline, PipelineControl, SkipCondition};
use crate::store::SharedStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// A request to create an order, either for a catalog variant or a free-form item.
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
  pub customer_name: String,
  pub phone_number: String,
  pub delivery_address: String,
  /// When set, item, price and currency come from the variant and stock is reserved.
  pub variant_id: Option<String>,
  /// Required when no variant is given.
  pub item: Option<String>,
  pub quantity: i32,
  /// Used only without a variant; defaults to zero.
  pub unit_price_cents: Option<i64>,
  pub currency: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct PlaceOrderContext {
  pub request: OrderRequest,
  pub default_currency: String,
  pub draft: Option<NewOrder>,
  pub variant: Option<ProductVariant>,
  pub customer: Option<Customer>,
  pub order: Option<Order>,
}

fn required(value: &str, field: &str) -> BotResult<()> {
  if value.trim().is_empty() {
    return Err(BotError::Validation(format!("{} is required.", field)));
  }
  Ok(())
}

fn draft_order(ctx: &PlaceOrderContext) -> NewOrder {
  let req = &ctx.request;
  NewOrder {
    customer_name: req.customer_name.trim().to_string(),
    phone_number: req.phone_number.trim().to_string(),
    item: req.item.clone().unwrap_or_default(),
    variant_id: None,
    variant_name: None,
    quantity: req.quantity,
    unit_price_cents: req.unit_price_cents.unwrap_or(0),
    currency: req.currency.clone().unwrap_or_else(|| ctx.default_currency.clone()),
    delivery_address: req.delivery_address.trim().to_string(),
    created_at: req.created_at.unwrap_or_else(Utc::now),
  }
}

pub fn build_place_pipeline(store: SharedStore) -> Pipeline<PlaceOrderContext> {
  let no_variant: SkipCondition<PlaceOrderContext> =
    Arc::new(|ctx: ContextData<PlaceOrderContext>| ctx.read().request.variant_id.is_none());

  let mut pipeline = Pipeline::new(
    "place_order",
    &[
      ("validate_request", false, None),
      ("resolve_variant", false, Some(no_variant)),
      ("ensure_customer", false, None),
      ("persist_order", false, None),
    ],
  );

  pipeline.on_root("validate_request", |ctx: ContextData<PlaceOrderContext>| async move {
    let mut guard = ctx.write();
    {
      let req = &guard.request;
      required(&req.customer_name, "Customer Name")?;
      required(&req.phone_number, "Phone Number")?;
      required(&req.delivery_address, "Delivery Address")?;
      validate_phone_number(&req.phone_number)?;
      if req.quantity <= 0 {
        return Err(BotError::Validation("Quantity must be greater than 0".to_string()));
      }
      if req.variant_id.is_none() {
        required(req.item.as_deref().unwrap_or_default(), "Item")?;
        if req.unit_price_cents.is_some_and(|p| p < 0) {
          return Err(BotError::Validation("Unit Price must be a non-negative number.".to_string()));
        }
      }
    }
    let draft = draft_order(&guard);
    guard.draft = Some(draft);
    Ok::<_, BotError>(PipelineControl::Continue)
  });

  let variant_store = store.clone();
  pipeline.on_root("resolve_variant", move |ctx: ContextData<PlaceOrderContext>| {
    let store = variant_store.clone();
    async move {
      let (variant_id, quantity) = {
        let guard = ctx.read();
        (guard.request.variant_id.clone().unwrap_or_default(), guard.request.quantity)
      };
      let variant = store
        .get_variant(&variant_id)
        .await?
        .ok_or_else(|| BotError::NotFound(format!("Product variant {} not found.", variant_id)))?;
      if !variant.is_available {
        return Err(BotError::VariantUnavailable(variant_id));
      }
      if variant.stock_quantity < quantity {
        return Err(BotError::InsufficientStock {
          variant_id,
          available: variant.stock_quantity,
          requested: quantity,
        });
      }

      let mut guard = ctx.write();
      if let Some(draft) = guard.draft.as_mut() {
        draft.item = variant.product_name.clone();
        draft.variant_id = Some(variant.id.clone());
        draft.variant_name = Some(variant.variant_name.clone());
        draft.unit_price_cents = variant.unit_price_cents;
        draft.currency = variant.currency.clone();
      }
      debug!(variant_id = %variant.id, stock = variant.stock_quantity, "Variant resolved.");
      guard.variant = Some(variant);
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  let customer_store = store.clone();
  pipeline.on_root("ensure_customer", move |ctx: ContextData<PlaceOrderContext>| {
    let store = customer_store.clone();
    async move {
      let new_customer = {
        let guard = ctx.read();
        NewCustomer {
          name: guard.request.customer_name.trim().to_string(),
          phone_number: guard.request.phone_number.trim().to_string(),
          address: Some(guard.request.delivery_address.trim().to_string()),
        }
      };
      let customer = match store.find_customer_by_phone(&new_customer.phone_number).await? {
        Some(existing) => existing,
        None => {
          let phone_number = new_customer.phone_number.clone();
          match store.insert_customer(new_customer).await {
            Ok(created) => {
              info!(phone_number = %created.phone_number, "Created customer record.");
              created
            }
            // Lost a race with a concurrent first order from the same number.
            Err(BotError::Conflict(_)) => store
              .find_customer_by_phone(&phone_number)
              .await?
              .ok_or_else(|| BotError::Internal(format!("Customer {} disappeared", phone_number)))?,
            Err(e) => return Err(e),
          }
        }
      };
      ctx.write().customer = Some(customer);
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  let order_store = store;
  pipeline.on_root("persist_order", move |ctx: ContextData<PlaceOrderContext>| {
    let store = order_store.clone();
    async move {
      let draft = ctx
        .read()
        .draft
        .clone()
        .ok_or_else(|| BotError::Internal("Order draft missing before persist".to_string()))?;
      let reserve_stock = draft.variant_id.is_some();
      let order = store.place_order(draft, reserve_stock).await?;
      info!(order_id = %order.id, total_cents = order.total_price_cents, reserved = order.stock_reserved, "Order placed.");
      ctx.write().order = Some(order);
      Ok::<_, BotError>(PipelineControl::Continue)
    }
  });

  pipeline
}
