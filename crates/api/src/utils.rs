use anyhow::Context;
use clap::Parser;
use climate_api_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_API_PORT, DEFAULT_DATABASE_PATH,
};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::{DateError, WindowAnchor};

/// Default size of the read-only connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate API - read-only precipitation and temperature endpoints over the Hawaii dataset"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_API_CONFIG, ./climate.toml,
    /// $XDG_CONFIG_HOME/climate-api/climate.toml, /etc/climate-api/climate.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "CLIMATE_API_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Path to the SQLite dataset holding the `measurement` and `station` tables
    #[arg(short, long, env = "CLIMATE_API_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,

    /// End of the trailing year used by /precipitation and /tobs:
    /// a YYYY-MM-DD date, or `latest` to follow the newest measurement
    #[arg(short, long, env = "CLIMATE_API_REFERENCE_DATE")]
    pub reference_date: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(short, long, env = "CLIMATE_API_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
    }

    pub fn window_anchor(&self) -> Result<WindowAnchor, DateError> {
        match &self.reference_date {
            Some(value) => value.parse(),
            None => Ok(WindowAnchor::default()),
        }
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: Cli) -> Cli {
        Cli {
            config: self.config.or(fallback.config),
            level: self.level.or(fallback.level),
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            database: self.database.or(fallback.database),
            reference_date: self.reference_date.or(fallback.reference_date),
            max_connections: self.max_connections.or(fallback.max_connections),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> anyhow::Result<Cli> {
    resolve_config(Cli::parse())
}

/// Merge parsed CLI args over the config file they point at (or the first
/// one found). A config file that exists but does not parse is an error.
pub fn resolve_config(cli_args: Cli) -> anyhow::Result<Cli> {
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("CLIMATE_API_CONFIG", "climate.toml")
    };

    let file_config: Cli = load_config(&source)
        .with_context(|| format!("failed to load config from {}", source))?;

    // CLI args override file config (env vars are handled by clap)
    Ok(cli_args.or(file_config))
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
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
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
