//! Shopping cart state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;
use crate::record::Record;

/// A product snapshot plus how many of it the buyer wants.
///
/// Serialized flat: the product fields with an extra `quantity`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn new(product: Product) -> Self {
        CartLineItem {
            product,
            quantity: 1,
        }
    }

    /// price × quantity
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

impl Record for CartLineItem {
    type Id = ProductId;

    fn record_id(&self) -> Self::Id {
        self.product.id
    }

    fn entity_name() -> &'static str {
        "cart item"
    }
}

/// An ordered list of line items, at most one per product id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored line items, merging duplicate product ids.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            match cart
                .items
                .iter_mut()
                .find(|existing| existing.product.id == item.product.id)
            {
                Some(existing) => existing.quantity += item.quantity,
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of `product`. Re-adding bumps the quantity of the
    /// existing line and keeps its original snapshot.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartLineItem::new(product.clone())),
        }
    }

    /// Drop the line for `product_id`. Returns false if there was none.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        crate::record::remove_by_id(&mut self.items, product_id) > 0
    }

    /// Σ price × quantity
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Total units across all lines (the header badge count).
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        crate::record::find_by_id(&self.items, product_id).is_some()
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
