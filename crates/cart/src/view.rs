//! Cart display models.
//!
//! Prices are preformatted so templates and UIs never do arithmetic.

use askama::Template;
use logos_core::{LineItemId, format_amount};
use serde::Serialize;

use crate::cart::{Cart, LineItem};
use crate::error::Result;

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: LineItemId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Render the cart as plain text.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Render`](crate::CartError::Render) if the
    /// template fails to render.
    pub fn render(&self) -> Result<String> {
        Ok(CartTemplate { cart: self }.render()?)
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.iter().map(CartItemView::from).collect(),
            subtotal: format_amount(cart.total_price()),
            item_count: cart.total_count(),
        }
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity.get(),
            price: item.price.to_string(),
            line_price: format_amount(item.subtotal()),
        }
    }
}

#[derive(Template)]
#[template(path = "cart.txt")]
struct CartTemplate<'a> {
    cart: &'a CartView,
}
