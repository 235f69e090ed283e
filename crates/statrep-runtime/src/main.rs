//! `statrep` entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use statrep_runtime::cli::Cli;
use statrep_runtime::commands::execute;
use statrep_runtime::{RuntimeConfig, StatrepContainer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env().context("invalid configuration")?;
    if let Some(path) = cli.database.clone() {
        config.storage.database_path = path;
    }

    let _telemetry = sr_telemetry::init_telemetry(config.telemetry.clone())
        .context("failed to initialize telemetry")?;
    info!(
        "[sr-runtime] statrep v{} using {}",
        statrep_runtime::VERSION,
        config.storage.database_path.display()
    );

    let container = StatrepContainer::open(config).context("failed to open database")?;

    let output = execute(&container, cli.command, cli.json).await?;
    print!("{output}");
    Ok(())
}
