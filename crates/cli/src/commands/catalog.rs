//! Service catalog commands.
//!
//! # Usage
//!
//! ```bash
//! logos-cart catalog list
//! logos-cart catalog add "Website Design" 500 -d "Five pages"
//! logos-cart catalog price "Website Design" 650
//! logos-cart catalog remove "Website Design"
//! ```
//!
//! # Environment Variables
//!
//! - `LOGOS_CATALOG_PATH` - Catalog YAML file (required)

use std::path::Path;

use logos_cart::{Catalog, ServiceListing};
use logos_core::Price;
use tracing::info;

use super::CommandError;
use crate::config::CliConfig;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn catalog_path(config: &CliConfig) -> Result<&Path, CommandError> {
    config.catalog_path.as_deref().ok_or(CommandError::NoCatalog)
}

/// List services.
///
/// # Errors
///
/// Returns an error if no catalog is configured or it cannot be read.
pub fn list(config: &CliConfig) -> CommandResult {
    let catalog = Catalog::load(catalog_path(config)?)?;
    if catalog.is_empty() {
        println!("No services listed.");
        return Ok(());
    }
    for service in catalog.services() {
        match &service.description {
            Some(description) => println!("{} - {} ({description})", service.name, service.price),
            None => println!("{} - {}", service.name, service.price),
        }
    }
    Ok(())
}

/// Add a service.
///
/// # Errors
///
/// Returns an error if the name is taken or the catalog cannot be written.
pub fn add(
    config: &CliConfig,
    name: &str,
    price: Price,
    description: Option<String>,
) -> CommandResult {
    let path = catalog_path(config)?;
    let mut catalog = Catalog::load(path)?;
    catalog.add(ServiceListing {
        name: name.to_owned(),
        price,
        description,
    })?;
    catalog.save(path)?;
    info!(name, %price, "Service added");
    println!("Service added successfully!");
    Ok(())
}

/// Change a service's price.
///
/// # Errors
///
/// Returns an error if the service does not exist or the catalog cannot be
/// written.
pub fn set_price(config: &CliConfig, name: &str, price: Price) -> CommandResult {
    let path = catalog_path(config)?;
    let mut catalog = Catalog::load(path)?;
    let old = catalog.set_price(name, price)?;
    catalog.save(path)?;
    info!(name, %old, new = %price, "Pricing updated");
    println!("Pricing updated: {name} - {price}");
    Ok(())
}

/// Remove a service.
///
/// # Errors
///
/// Returns an error if the service does not exist or the catalog cannot be
/// written.
pub fn remove(config: &CliConfig, name: &str) -> CommandResult {
    let path = catalog_path(config)?;
    let mut catalog = Catalog::load(path)?;
    catalog.remove(name)?;
    catalog.save(path)?;
    println!("Removed {name}");
    Ok(())
}
