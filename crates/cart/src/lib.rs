//! Logos Cart - shopping cart store for the Logos site.
//!
//! The [`CartStore`] owns an ordered, name-deduplicated list of line items,
//! mirrors it to a [`Persistence`] slot after every change, and notifies
//! [`CartObserver`]s so a UI layer can re-render.
//!
//! # Modules
//!
//! - [`cart`] - `Cart` and `LineItem`
//! - [`store`] - `CartStore` operations
//! - [`storage`] - Key/value persistence slots
//! - [`events`] - Change events and notifications
//! - [`view`] - Display models and text rendering
//! - [`checkout`] - Order summaries and payment gateways
//! - [`catalog`] - Service catalog maintained by site admins

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod events;
pub mod storage;
pub mod store;
pub mod view;

pub use cart::{Cart, LineItem};
pub use catalog::{Catalog, CatalogError, ServiceListing};
pub use checkout::{
    CheckoutReceipt, OrderLine, OrderSummary, PaymentConfirmation, PaymentError, PaymentGateway,
    PaymentProvider, StubGateway,
};
pub use error::{CartError, Result};
pub use events::{CartEvent, CartObserver, Notification};
pub use storage::{FileStorage, MemoryStorage, Persistence, StorageError, validate_key};
pub use store::{CartStore, DEFAULT_CART_KEY};
pub use view::{CartItemView, CartView};
