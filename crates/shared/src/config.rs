//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Shop-level business defaults.
    #[serde(default)]
    pub shop: ShopConfig,
    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations on server start.
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Shop-level business defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    /// Timezone used to decide "today" and "this month".
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// Prefix of the human-readable order folio.
    #[serde(default = "default_folio_prefix")]
    pub folio_prefix: String,
    /// Monthly cutoff day used when the `settings` table has no valid value.
    #[serde(default = "default_cutoff_day")]
    pub default_cutoff_day: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            folio_prefix: default_folio_prefix(),
            default_cutoff_day: default_cutoff_day(),
        }
    }
}

fn default_timezone() -> Tz {
    chrono_tz::America::Mexico_City
}

fn default_folio_prefix() -> String {
    "OS".to_string()
}

fn default_cutoff_day() -> u32 {
    28
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TORQUE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
