//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! logos-cart add "Logo Design" --price 150
//! logos-cart set-quantity <ID> 2
//! logos-cart show
//! logos-cart checkout
//! ```

use logos_cart::{
    Cart, CartEvent, CartStore, Catalog, FileStorage, OrderSummary, PaymentProvider, StubGateway,
};
use logos_core::{LineItemId, Price, format_amount};
use tracing::{debug, info};

use super::CommandError;
use crate::config::CliConfig;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Restore the cart from the configured slot and print notifications as
/// they happen.
///
/// A malformed slot restores as an empty cart; a slot that cannot be read
/// is an error, so nothing overwrites it.
fn open_store(config: &CliConfig) -> Result<CartStore<FileStorage>, Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&config.data_dir)?;
    let mut store = CartStore::restore(storage, config.cart_key.clone())?;

    let duration = config.notification_duration;
    store.subscribe(move |event: &CartEvent, _cart: &Cart| {
        if let Some(notification) = event.notification() {
            let notification = notification.with_duration(duration);
            debug!(duration_ms = notification.duration.as_millis(), "Notification");
            println!("{}", notification.message);
        }
    });

    Ok(store)
}

/// Price to use for `name`: the explicit one, else the catalog's.
fn resolve_price(
    config: &CliConfig,
    name: &str,
    price: Option<Price>,
) -> Result<Price, Box<dyn std::error::Error>> {
    if let Some(price) = price {
        return Ok(price);
    }
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default(),
    };
    catalog
        .find(name)
        .map(|service| service.price)
        .ok_or_else(|| CommandError::MissingPrice(name.to_owned()).into())
}

/// Add one unit of a service.
///
/// # Errors
///
/// Returns an error if no price is known or storage cannot be opened.
pub fn add(config: &CliConfig, name: &str, price: Option<Price>) -> CommandResult {
    let price = resolve_price(config, name, price)?;
    let mut store = open_store(config)?;
    let id = store.add(name, price);
    info!(%id, name, "Added to cart");
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn remove(config: &CliConfig, id: LineItemId) -> CommandResult {
    let mut store = open_store(config)?;
    if store.remove(id) {
        println!("Removed item {id}");
    } else {
        println!("No item {id} in cart");
    }
    Ok(())
}

/// Set a line's quantity from raw input.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn set_quantity(config: &CliConfig, id: LineItemId, quantity: &str) -> CommandResult {
    let mut store = open_store(config)?;
    if store.set_quantity_input(id, quantity) {
        if let Some(item) = store.cart().get(id) {
            println!("{} quantity set to {}", item.name, item.quantity);
        }
    } else {
        println!("No item {id} in cart");
    }
    Ok(())
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or rendering fails.
pub fn show(config: &CliConfig, json: bool) -> CommandResult {
    let store = open_store(config)?;
    let view = store.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", view.render()?.trim_end());
    }
    Ok(())
}

/// Print the number of units in the cart.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn count(config: &CliConfig) -> CommandResult {
    let store = open_store(config)?;
    println!("{}", store.total_count());
    Ok(())
}

/// Print the cart total.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn total(config: &CliConfig) -> CommandResult {
    let store = open_store(config)?;
    println!("{}", format_amount(store.total_price()));
    Ok(())
}

/// Show the order summary, collect payment, and empty the cart.
///
/// # Errors
///
/// Returns an error if the cart is empty, the payment is not confirmed, or
/// storage cannot be opened.
pub fn checkout(config: &CliConfig, provider: Option<PaymentProvider>) -> CommandResult {
    let mut store = open_store(config)?;

    if let Some(order) = OrderSummary::from_cart(store.cart()) {
        println!("{}", order.render()?.trim_end());
        println!();
        println!("Processing payment...");
    }

    let provider = provider.unwrap_or(config.payment.provider);
    debug!(%provider, has_api_key = config.payment.has_api_key(), "Checking out");
    let mut gateway = StubGateway::new(provider);
    if let Some(api_key) = &config.payment.api_key {
        gateway = gateway.with_api_key(api_key.clone());
    }

    let receipt = store.checkout(&mut gateway)?;
    println!(
        "Paid {} via {} (reference {})",
        format_amount(receipt.confirmation.amount),
        receipt.confirmation.provider,
        receipt.confirmation.reference
    );
    Ok(())
}
