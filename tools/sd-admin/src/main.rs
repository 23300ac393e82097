//! sd-admin: StaffDesk admin console

use std::process::ExitCode;

use clap::Parser;
use sd_admin::{commands, Cli, Console};
use sd_telemetry::{init_telemetry, TelemetryConfig};

/// Log filter when neither the flag nor the environment sets one.
const DEFAULT_CLI_LOG_LEVEL: &str = "warn";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.global.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    } else if std::env::var_os("SD_LOG_LEVEL").is_none() && std::env::var_os("RUST_LOG").is_none() {
        telemetry = telemetry.with_log_level(DEFAULT_CLI_LOG_LEVEL);
    }
    if let Err(e) = init_telemetry(&telemetry) {
        eprintln!("Warning: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let console = Console::connect(&cli.global)?;
    commands::execute(&console, cli.command).await
}
