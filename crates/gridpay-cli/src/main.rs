//! gridpay - interactive terminal client for Grid smart accounts.
//!
//! Log in with email and a one-time code, check balances, and send USDC or
//! SOL from the account on Solana devnet (sandbox) or mainnet (production).

mod app;
mod ui;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gridpay_core::{Config, GridClient, SolanaRpc};

use app::App;
use ui::ConsolePresenter;

/// Filter applied in debug mode when RUST_LOG is not set
const DEBUG_FILTER: &str = "warn,gridpay=debug,gridpay_core=debug";

#[derive(Parser, Debug)]
#[command(name = "gridpay", version, about = "Interactive client for Grid smart accounts")]
struct Cli {
    /// Show request details, raw responses and full error chains
    #[arg(short, long)]
    debug: bool,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(debug: bool) {
    // RUST_LOG wins over the debug flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new(DEBUG_FILTER)
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let debug = cli.debug || config.debug;
    init_tracing(debug);
    info!(environment = %config.environment, rpc = %config.rpc_url, "gridpay starting");

    let api = GridClient::new(&config)?;
    let rpc = SolanaRpc::new(config.rpc_url.clone());

    let mut app = App::new(api, rpc, config.environment, ConsolePresenter::new(debug));
    app.run().await?;

    info!("gridpay shutting down");
    Ok(())
}
