//! Reversion - Streaming Z-Score Mean Reversion Backtester
//!
//! Runs the mean reversion backtest over CSV price columns and prints or
//! exports the per-step profit table and capital curve.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use reversion_bt::adapters::cli::{self, CliApp};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (REVERSION_DATA_DIR and RUST_LOG go here)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    cli::execute(app).await
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}
