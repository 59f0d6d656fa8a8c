// core/src/catalog.rs

//! Read side of the product variants: the numbered chat menu, variant
//! listings and the grouped products menu.

use crate::error::{BotError, BotResult};
use crate::models::{format_money, ProductVariant};
use crate::store::{SharedStore, VariantFilter};
use serde::Serialize;
use tracing::instrument;

/// Number of entries shown in the chat menu.
pub const CHAT_MENU_SIZE: usize = 10;

/// One numbered line of the chat menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
  pub variant_id: String,
  pub product_name: String,
  pub name: String,
  pub unit_price_cents: i64,
  pub currency: String,
}

impl From<&ProductVariant> for MenuItem {
  fn from(v: &ProductVariant) -> Self {
    Self {
      variant_id: v.id.clone(),
      product_name: v.product_name.clone(),
      name: v.variant_name.clone(),
      unit_price_cents: v.unit_price_cents,
      currency: v.currency.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuVariant {
  pub variant_id: String,
  pub variant_name: String,
  pub unit_price_cents: i64,
  pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductGroup {
  pub product_name: String,
  pub variants: Vec<MenuVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductsMenu {
  pub products: Vec<ProductGroup>,
  pub formatted_menu: String,
}

/// Renders the numbered chat menu lines, e.g. `"1. Coca Cola - Small - KES 80.00"`.
pub fn menu_lines(items: &[MenuItem]) -> String {
  items
    .iter()
    .enumerate()
    .map(|(idx, item)| {
      format!(
        "{}. {} - {}\n",
        idx + 1,
        item.name,
        format_money(item.unit_price_cents, &item.currency)
      )
    })
    .collect()
}

#[derive(Clone)]
pub struct Catalog {
  store: SharedStore,
}

impl Catalog {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  /// The first sellable variants (available, stock above zero) in product/variant name order.
  #[instrument(name = "Catalog::chat_menu", skip(self))]
  pub async fn chat_menu(&self) -> BotResult<Vec<MenuItem>> {
    let filter = VariantFilter {
      product_name: None,
      available_only: true,
    };
    let variants = self.store.list_variants(&filter).await?;
    Ok(
      variants
        .iter()
        .filter(|v| v.is_sellable())
        .take(CHAT_MENU_SIZE)
        .map(MenuItem::from)
        .collect(),
    )
  }

  /// Available variants, optionally narrowed to products whose name contains `product_name`.
  pub async fn list_variants(&self, product_name: Option<&str>) -> BotResult<Vec<ProductVariant>> {
    let filter = VariantFilter {
      product_name: product_name.map(str::to_string).filter(|s| !s.trim().is_empty()),
      available_only: true,
    };
    self.store.list_variants(&filter).await
  }

  pub async fn variant_details(&self, variant_id: &str) -> BotResult<ProductVariant> {
    self
      .store
      .get_variant(variant_id)
      .await?
      .ok_or_else(|| BotError::NotFound(format!("Variant {} not found.", variant_id)))
  }

  /// Available variants grouped per product, cheapest first within a product.
  pub async fn products_menu(&self) -> BotResult<ProductsMenu> {
    let mut variants = self.list_variants(None).await?;
    variants.sort_by(|a, b| {
      a.product_name
        .cmp(&b.product_name)
        .then_with(|| a.unit_price_cents.cmp(&b.unit_price_cents))
    });

    let mut products: Vec<ProductGroup> = Vec::new();
    for v in variants {
      let entry = MenuVariant {
        variant_id: v.id,
        variant_name: v.variant_name,
        unit_price_cents: v.unit_price_cents,
        currency: v.currency,
      };
      match products.last_mut() {
        Some(group) if group.product_name == v.product_name => group.variants.push(entry),
        _ => products.push(ProductGroup {
          product_name: v.product_name,
          variants: vec![entry],
        }),
      }
    }

    let mut lines = Vec::new();
    for group in &products {
      lines.push(format!("*{}*:", group.product_name));
      for v in &group.variants {
        lines.push(format!(
          "  - {}: {}",
          v.variant_name,
          format_money(v.unit_price_cents, &v.currency)
        ));
      }
    }

    Ok(ProductsMenu {
      products,
      formatted_menu: lines.join("\n"),
    })
  }
}
