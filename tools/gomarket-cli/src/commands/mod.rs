//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod reset;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    #[arg(long)]
    pub id: String,

    /// Product title.
    #[arg(short, long)]
    pub title: String,

    /// Product image URL.
    #[arg(short, long, default_value = "")]
    pub image_url: String,

    /// Unit price.
    #[arg(short, long, value_parser = parse_price)]
    pub price: f64,
}

/// Parse a unit price, refusing NaN and infinities, which cannot be stored.
fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.parse().map_err(|e| format!("invalid price `{s}`: {e}"))?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err(format!("price must be a finite number, got `{s}`"))
    }
}

/// Arguments for the inc and dec commands.
#[derive(Args)]
pub struct QuantityArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the reset command.
#[derive(Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
