//! GoMarket CLI - inspect and edit the persisted shopping cart.
//!
//! Commands:
//! - `gomarket list` - Show the cart
//! - `gomarket add` - Add one unit of a product
//! - `gomarket inc` / `gomarket dec` - Change a line's quantity
//! - `gomarket reset` - Erase the whole store
//! - `gomarket config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, ConfigArgs, QuantityArgs, ResetArgs};

/// GoMarket CLI - Inspect and edit the persisted shopping cart
#[derive(Parser)]
#[command(name = "gomarket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cart lines
    List,

    /// Add one unit of a product
    Add(AddArgs),

    /// Increase a product's quantity by one
    Inc(QuantityArgs),

    /// Decrease a product's quantity by one (never below zero)
    Dec(QuantityArgs),

    /// Erase every key in the store
    Reset(ResetArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    logging::init_tracing(&ctx.config.log, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::List => commands::cart::list(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Inc(args) => commands::cart::increment(args, &ctx).await,
        Commands::Dec(args) => commands::cart::decrement(args, &ctx).await,
        Commands::Reset(args) => commands::reset::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
