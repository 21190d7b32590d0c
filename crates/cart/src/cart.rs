//! Cart contents.

use std::collections::HashSet;

use logos_core::{LineItemId, Price, Quantity};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub name: String,
    /// Unit price.
    pub price: Price,
    pub quantity: Quantity,
}

impl LineItem {
    /// Returns `price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.line_total(self.quantity)
    }
}

/// Ordered collection of line items with unique names.
///
/// Serializes as a plain JSON array of line items. Deserialization rejects
/// duplicate names or IDs, so a `Cart` read from storage always upholds the
/// same invariants as one built through [`crate::CartStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, checking that names and IDs are unique.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedPersistedState`] on a duplicate name or ID.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut names = HashSet::with_capacity(items.len());
        let mut ids = HashSet::with_capacity(items.len());
        for item in &items {
            if !names.insert(item.name.as_str()) {
                return Err(CartError::MalformedPersistedState(format!(
                    "duplicate item name {:?}",
                    item.name
                )));
            }
            if !ids.insert(item.id) {
                return Err(CartError::MalformedPersistedState(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by ID.
    #[must_use]
    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Look up a line item by product name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of `price * quantity` over all items, unrounded.
    #[must_use]
    pub fn raw_total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.subtotal()))
    }

    /// Cart total rounded to cents.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.raw_total()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub(crate) fn find_by_name_mut(&mut self, name: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.name == name)
    }

    pub(crate) fn get_mut(&mut self, id: LineItemId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub(crate) fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub(crate) fn remove(&mut self, id: LineItemId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
