//! Logos cart CLI - drive the cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add a service at an explicit price
//! logos-cart add "Logo Design" --price 150.00
//!
//! # Add a service priced from the catalog (LOGOS_CATALOG_PATH)
//! logos-cart add "Business Cards"
//!
//! # Change a quantity, remove a line, show the cart
//! logos-cart set-quantity 1700000000000 3
//! logos-cart remove 1700000000000
//! logos-cart show
//!
//! # Pay and empty the cart
//! logos-cart checkout --provider paypal
//!
//! # Maintain the service catalog
//! logos-cart catalog add "Website Design" 500 --description "Five pages"
//! logos-cart catalog price "Website Design" 650
//! ```
//!
//! Every invocation restores the cart from its slot, runs one operation,
//! and writes the slot back.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use logos_cart::PaymentProvider;
use logos_core::{LineItemId, Price};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "logos-cart")]
#[command(author, version, about = "Logos shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a service to the cart
    Add {
        /// Service name
        name: String,

        /// Unit price; looked up in the catalog when omitted
        #[arg(short, long)]
        price: Option<Price>,
    },
    /// Remove a line from the cart
    Remove {
        /// Line item ID
        id: LineItemId,
    },
    /// Set the quantity of a line (non-numbers and values below 1 become 1)
    SetQuantity {
        /// Line item ID
        id: LineItemId,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Show the cart
    Show {
        /// Print the cart as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the number of units in the cart
    Count,
    /// Print the cart total
    Total,
    /// Pay for the cart and empty it
    Checkout {
        /// Payment provider (overrides `LOGOS_PAYMENT_PROVIDER`)
        #[arg(long)]
        provider: Option<PaymentProvider>,
    },
    /// Manage the service catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List services and prices
    List,
    /// Add a service
    Add {
        /// Service name
        name: String,

        /// Unit price
        price: Price,

        /// Short description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a service's price
    Price {
        /// Service name
        name: String,

        /// New unit price
        price: Price,
    },
    /// Remove a service
    Remove {
        /// Service name
        name: String,
    },
}

/// Log filter used when `RUST_LOG` is not set. The library and this binary
/// both log under the `logos_cart` target.
const DEFAULT_LOG_FILTER: &str = "logos_cart=info";

fn main() {
    // Logs go to stderr so command output stays clean on stdout.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Add { name, price } => commands::cart::add(&config, &name, price)?,
        Commands::Remove { id } => commands::cart::remove(&config, id)?,
        Commands::SetQuantity { id, quantity } => {
            commands::cart::set_quantity(&config, id, &quantity)?;
        }
        Commands::Show { json } => commands::cart::show(&config, json)?,
        Commands::Count => commands::cart::count(&config)?,
        Commands::Total => commands::cart::total(&config)?,
        Commands::Checkout { provider } => commands::cart::checkout(&config, provider)?,
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&config)?,
            CatalogAction::Add {
                name,
                price,
                description,
            } => commands::catalog::add(&config, &name, price, description)?,
            CatalogAction::Price { name, price } => {
                commands::catalog::set_price(&config, &name, price)?;
            }
            CatalogAction::Remove { name } => commands::catalog::remove(&config, &name)?,
        },
    }
    Ok(())
}
