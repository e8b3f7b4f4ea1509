//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments / environment variables (handled by the binary's clap parser)
//! 2. TOML config file
//! 3. Built-in defaults
//!
//! The TOML file is taken from an explicit path when one is given, otherwise
//! from `<config dir>/kura/<module>.toml` if that exists. A missing default
//! file is not an error; a missing explicit file is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default HTTP port for kura-reg
pub const DEFAULT_PORT: u16 = 5780;

/// TOML bootstrap configuration
///
/// Every field is optional in the file; missing fields take the defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database file (relative to the working directory or absolute)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Location catalog JSON file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Bearer token for admin routes; absent disables the admin gate
    #[serde(default)]
    pub admin_token: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            catalog_path: default_catalog_path(),
            admin_token: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_path() -> PathBuf {
    PathBuf::from("kura.db")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("public").join("county.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse TOML configuration text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Read and parse a TOML configuration file
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded TOML configuration from {}", path.display());
        Ok(config)
    }
}

/// Command-line / environment overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub admin_token: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub catalog_path: PathBuf,
    pub admin_token: Option<String>,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve configuration for `module_name` from overrides, TOML and defaults
    pub async fn resolve(module_name: &str, overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match &overrides.config_file {
            Some(path) => TomlConfig::load(path).await?,
            None => match default_config_file(module_name) {
                Some(path) if path.exists() => TomlConfig::load(&path).await?,
                _ => {
                    info!("No config file found for {}, using defaults", module_name);
                    TomlConfig::default()
                }
            },
        };

        Ok(Self::merge(toml_config, overrides))
    }

    /// Apply overrides on top of a TOML configuration
    pub fn merge(toml_config: TomlConfig, overrides: ConfigOverrides) -> Self {
        // An empty token means "no token", both from CLI and from TOML
        let admin_token = overrides
            .admin_token
            .or(toml_config.admin_token)
            .filter(|t| !t.trim().is_empty());

        Self {
            host: overrides.host.unwrap_or(toml_config.host),
            port: overrides.port.unwrap_or(toml_config.port),
            database_path: overrides.database_path.unwrap_or(toml_config.database_path),
            catalog_path: overrides.catalog_path.unwrap_or(toml_config.catalog_path),
            admin_token,
            log_level: toml_config.logging.level,
        }
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Platform config file location, e.g. `~/.config/kura/kura-reg.toml` on Linux
pub fn default_config_file(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kura").join(format!("{}.toml", module_name)))
}
