//! Shard-Admin: Shard Registry command-line tool
//!
//! Prints JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use shard_admin::{run, Cli};
use shard_telemetry::{init_telemetry, TelemetryConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    let _guard = init_telemetry(telemetry).context("initializing logging")?;

    let output = run(&cli.command)?;
    shard_telemetry::log_event!(debug, "shard-admin", "Command finished");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
