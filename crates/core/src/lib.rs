//! Logos Core - Shared value types.
//!
//! This crate provides the value types used across the Logos cart components:
//! - `cart` - Cart store, persistence, checkout, and the service catalog
//! - `cli` - The `logos-cart` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! rendering. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for line item IDs, prices, and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
