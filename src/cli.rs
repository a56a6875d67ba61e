//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::sink::influx::InfluxConfig;
use crate::util::constants::{DEFAULT_DATABASE, DEFAULT_INFLUX_HOST, DEFAULT_INFLUX_PORT};

/// Imports an export of Apple Health into an InfluxDB database.
///
/// Only records newer than the previous import are written, so the same
/// (or a newer) export can be imported repeatedly.
#[derive(Debug, Parser)]
#[command(name = "healthflux", version)]
pub struct Cli {
    /// Log verbosity. `RUST_LOG` takes precedence when set.
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Host running the InfluxDB server.
    #[arg(long, env = "HEALTHFLUX_INFLUXDB_HOST", default_value = DEFAULT_INFLUX_HOST)]
    pub influxdb_host: String,

    /// InfluxDB HTTP port.
    #[arg(long, env = "HEALTHFLUX_INFLUXDB_PORT", default_value_t = DEFAULT_INFLUX_PORT)]
    pub influxdb_port: u16,

    /// InfluxDB database name (created if absent).
    #[arg(long, env = "HEALTHFLUX_INFLUXDB_DBNAME", default_value = DEFAULT_DATABASE)]
    pub influxdb_dbname: String,

    /// Path to the `export.zip` produced by the Health app.
    #[arg(value_name = "EXPORT", value_parser = existing_file)]
    pub export: PathBuf,
}

impl Cli {
    pub fn influx_config(&self) -> InfluxConfig {
        InfluxConfig::new(
            &self.influxdb_host,
            self.influxdb_port,
            self.influxdb_dbname.clone(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    /// Default `EnvFilter` directive for this level.
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

fn existing_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if !path.exists() {
        return Err(format!("'{s}' does not exist"));
    }
    if path.is_dir() {
        return Err(format!("'{s}' is a directory"));
    }
    Ok(path)
}
