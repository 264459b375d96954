use anyhow::anyhow;
use clap::Parser;
use climate_core::{find_config_file, load_config, ConfigSource, DEFAULT_API_PORT};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::DEFAULT_MOST_ACTIVE_STATION;

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Station Climate API - read-only precipitation and temperature queries over a station observation dataset"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_API_CONFIG, ./climate-api.toml,
    /// $XDG_CONFIG_HOME/station-climate/climate-api.toml, /etc/station-climate/climate-api.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "CLIMATE_API_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Path to the sqlite observation dataset (opened read-only)
    #[arg(short = 'b', long, env = "CLIMATE_API_DATABASE")]
    pub database: Option<String>,

    /// Station id reported by /api/v1.0/tobs
    #[arg(short = 's', long, env = "CLIMATE_API_STATION")]
    pub most_active_station: Option<String>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| "./Resources/hawaii.sqlite".to_string())
    }

    pub fn most_active_station(&self) -> String {
        self.most_active_station
            .clone()
            .unwrap_or_else(|| DEFAULT_MOST_ACTIVE_STATION.to_string())
    }

    /// Fill any value not given on the command line or environment from `file`
    pub fn merge(self, file: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file.level),
            domain: self.domain.or(file.domain),
            port: self.port.or(file.port),
            database: self.database.or(file.database),
            most_active_station: self.most_active_station.or(file.most_active_station),
        }
    }
}

/// Load configuration from CLI args, config file, and environment. A config
/// file that was found or named but cannot be read or parsed is an error.
pub fn get_config_info() -> anyhow::Result<(Cli, ConfigSource)> {
    resolve_config(Cli::parse())
}

pub fn resolve_config(cli_args: Cli) -> anyhow::Result<(Cli, ConfigSource)> {
    let source = match &cli_args.config {
        Some(path) => ConfigSource::Explicit(path.into()),
        None => find_config_file("CLIMATE_API_CONFIG", "climate-api.toml"),
    };

    // CLI args and env vars override file config
    let file_config: Cli = load_config(&source)
        .map_err(|e| anyhow!("failed to load config from {}: {}", source, e))?;

    Ok((cli_args.merge(file_config), source))
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    level_str.parse().unwrap_or(LevelFilter::Info)
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
