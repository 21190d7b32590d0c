//! CLI command implementations.
//!
//! Commands write their results to stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

pub mod cart;
pub mod catalog;

use thiserror::Error;

/// Errors specific to CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No price was given and the catalog has none.
    #[error("No price for {0:?}: pass --price or add it to the catalog")]
    MissingPrice(String),

    /// A catalog command ran without a catalog file configured.
    #[error("No catalog configured: set LOGOS_CATALOG_PATH")]
    NoCatalog,
}
