//! healthflux: incremental Apple Health export importer for InfluxDB.
//!
//! Entry point: parses the command line, initialises structured logging
//! and runs one import.

use std::process::ExitCode;

use clap::Parser;

use healthflux::cli::{Cli, LogLevel};
use healthflux::core::importer::run_import;
use healthflux::sink::influx::InfluxClient;
use healthflux::util::constants;
use healthflux::util::error::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    tracing::info!("{} v{} starting", constants::APP_NAME, constants::APP_VERSION);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Import of {} failed: {}", cli.export.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.influx_config();
    tracing::debug!(
        "Writing to database '{}' at {}",
        config.database,
        config.base_url
    );
    let mut client = InfluxClient::new(config)?;
    run_import(&mut client, &cli.export)?;
    Ok(())
}

/// Initialise the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--log-level` picks the filter.
fn init_logging(level: LogLevel) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer as _;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter()));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_layer.with_filter(env_filter))
        .init();
}
