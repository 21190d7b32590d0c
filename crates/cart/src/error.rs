//! Cart error type.

use thiserror::Error;

use crate::checkout::PaymentError;
use crate::storage::StorageError;

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The persisted slot holds data that is not a valid cart.
    #[error("Malformed persisted cart: {0}")]
    MalformedPersistedState(String),

    /// Reading or writing the persisted slot failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout was requested with nothing in the cart.
    #[error("Your cart is empty!")]
    EmptyCart,

    /// The payment collaborator did not confirm the order.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
