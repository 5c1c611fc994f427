//! Configuration management for dronefleet services.

use dronefleet_domain::FleetLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub limits: FleetLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database; `None` selects the in-memory store.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Seconds between battery audit log passes.
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { db_path: None }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            audit: AuditConfig::default(),
            logging: LoggingConfig::default(),
            limits: FleetLimits::default(),
        }
    }

    /// Default configuration with environment overrides applied:
    /// `DRONEFLEET_PORT`, `DRONEFLEET_DB_PATH`, `DRONEFLEET_AUDIT_SECS`,
    /// `DRONEFLEET_LOG_JSON`.
    pub fn from_env() -> Self {
        let mut config = Self::default_config();
        if let Ok(port) = std::env::var("DRONEFLEET_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(path) = std::env::var("DRONEFLEET_DB_PATH") {
            config.storage.db_path = Some(PathBuf::from(path));
        }
        if let Ok(secs) = std::env::var("DRONEFLEET_AUDIT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.audit.interval_secs = secs;
            }
        }
        if let Ok(json) = std::env::var("DRONEFLEET_LOG_JSON") {
            config.logging.json = json == "1" || json.eq_ignore_ascii_case("true");
        }
        config
    }
}
