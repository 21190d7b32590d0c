//! Integration tests for the Logos cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p logos-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart store against a real file-backed slot
//! - `cart_properties` - Property tests over cart operations
//!
//! This library holds helpers shared by the test files.

use logos_cart::{CartStore, DEFAULT_CART_KEY, FileStorage};
use logos_core::Price;
use tempfile::TempDir;

/// A cart store backed by a throwaway directory.
///
/// The directory is deleted when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
}

impl TestContext {
    /// Create a fresh storage directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Open the storage directory as a persistence slot.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be opened.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn storage(&self) -> FileStorage {
        FileStorage::open(self.dir.path()).expect("Failed to open storage")
    }

    /// Restore a store from the default slot, as a fresh page load would.
    ///
    /// # Panics
    ///
    /// Panics if the slot cannot be read.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn restore(&self) -> CartStore<FileStorage> {
        CartStore::restore(self.storage(), DEFAULT_CART_KEY).expect("Failed to read cart slot")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a price literal.
///
/// # Panics
///
/// Panics if `s` is not a valid price.
#[must_use]
#[allow(clippy::expect_used)]
pub fn price(s: &str) -> Price {
    Price::parse(s).expect("valid price literal")
}
