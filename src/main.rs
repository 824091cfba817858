use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use tires_parser::cli::{self, Cli};
use tires_parser::infrastructure::config::AppConfig;
use tires_parser::infrastructure::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    logging::log_system_info();

    if let Err(e) = cli::dispatch(cli, config).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
