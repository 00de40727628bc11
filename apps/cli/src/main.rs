//! # RocketShoes CLI
//!
//! Command-line front-end for the cart. Each invocation opens the persisted
//! cart, runs one operation against the storefront API and prints the result.
//!
//! ## Usage
//! ```bash
//! rocketshoes show
//! rocketshoes add 3
//! rocketshoes update 3 2
//! rocketshoes remove 3
//! rocketshoes --api-url http://localhost:3333 --json show
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging (stderr, RUST_LOG or info,rocketshoes=debug)     │
//! │  2. Load config: defaults → rocketshoes.toml → environment → flags     │
//! │  3. Build HttpInventory and FileStore                                   │
//! │  4. CartStore::open (restores "@RocketShoes:cart")                     │
//! │  5. Run the command, print cart + notices                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only steps 2-4 can make the process exit non-zero.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rocketshoes_cart::CartStore;
use rocketshoes_core::{AmountUpdate, ProductId};
use rocketshoes_inventory::HttpInventory;
use rocketshoes_storage::FileStore;

use crate::commands::Command;
use crate::config::{CliConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    /// Config file (default: platform config dir/rocketshoes.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Storefront API base URL
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Inventory request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Directory holding the persisted cart
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: CartCommand,
}

#[derive(Subcommand, Debug)]
enum CartCommand {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: i64,
    },
    /// Set the quantity of a product
    Update {
        /// Product id
        id: i64,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl From<CartCommand> for Command {
    fn from(command: CartCommand) -> Self {
        match command {
            CartCommand::Show => Command::Show,
            CartCommand::Add { id } => Command::Add(ProductId::new(id)),
            CartCommand::Remove { id } => Command::Remove(ProductId::new(id)),
            CartCommand::Update { id, amount } => {
                Command::Update(AmountUpdate::new(ProductId::new(id), amount))
            }
        }
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
            data_dir: self.data_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.clone(), &cli.overrides())
        .context("Failed to load configuration")?;
    info!(
        api_url = %config.inventory.base_url,
        timeout_secs = config.inventory.timeout_secs,
        "Configuration loaded"
    );

    let inventory = HttpInventory::new(&config.inventory.base_url, config.timeout())
        .context("Failed to build inventory client")?;

    let storage = match config.storage.data_dir {
        Some(ref dir) => FileStore::open(dir),
        None => FileStore::open_default(),
    }
    .context("Failed to open cart storage")?;
    info!(dir = ?storage.dir(), "Cart storage ready");

    let store = CartStore::open(inventory, storage);
    let report = commands::execute(&store, cli.command.into()).await;

    if cli.json {
        println!("{}", commands::render_json(&report)?);
    } else {
        print!("{}", commands::render_text(&report));
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only the cart.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rocketshoes_cart=trace` - Trace for the cart store only
/// - Default: INFO, DEBUG for rocketshoes crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rocketshoes=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
