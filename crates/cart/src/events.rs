//! Cart change events and user-facing notifications.
//!
//! The store never touches presentation. It emits a [`CartEvent`] after each
//! change and leaves rendering and toasts to whoever subscribed.

use std::time::Duration;

use logos_core::{LineItemId, Quantity};
use serde::Serialize;

use crate::cart::Cart;

/// How long a notification stays on screen unless configured otherwise.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// A change to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// The cart was loaded (or reloaded) from storage.
    Restored { items: usize },
    /// A line was appended, or an existing line's quantity bumped.
    ItemAdded {
        id: LineItemId,
        name: String,
        quantity: Quantity,
    },
    ItemRemoved { id: LineItemId, name: String },
    QuantityChanged { id: LineItemId, quantity: Quantity },
    /// The cart was emptied after a confirmed checkout.
    Cleared,
}

impl CartEvent {
    /// The transient message to show for this event, if any.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Self::ItemAdded { name, .. } => Some(Notification::new(format!("{name} added to cart!"))),
            Self::Cleared => Some(Notification::new("Order placed successfully!")),
            Self::Restored { .. } | Self::ItemRemoved { .. } | Self::QuantityChanged { .. } => {
                None
            }
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    /// Create a notification with the default display duration.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Override the display duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Receives cart changes.
///
/// Called synchronously after the change has been persisted, with the cart
/// as it now stands.
pub trait CartObserver {
    fn on_change(&mut self, event: &CartEvent, cart: &Cart);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent, &Cart),
{
    fn on_change(&mut self, event: &CartEvent, cart: &Cart) {
        self(event, cart);
    }
}
