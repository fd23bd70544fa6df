//! Application configuration
//!
//! Loaded from a TOML file. The path defaults to
//! `~/.config/fleetlink/config.toml` and can be overridden with the
//! `FLEETLINK_CONFIG` environment variable. Missing files fall back to
//! defaults so the service starts out of the box.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests during shutdown.
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite database file path.
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter directive, e.g. "info" or "fleetlink=debug,sea_orm=warn".
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// How often the background task scans for bookings past their end time.
    pub check_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 10,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "./fleetlink.db".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseSettings::default(),
            logging: LoggingConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

impl DatabaseSettings {
    /// SQLite connection URL, creating the file on first use.
    pub fn connection_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        let config: AppConfig = toml::from_str(&raw)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the config path: `FLEETLINK_CONFIG` env var, otherwise
    /// `~/.config/fleetlink/config.toml`.
    pub fn resolve_path() -> PathBuf {
        if let Ok(p) = std::env::var("FLEETLINK_CONFIG") {
            return PathBuf::from(p);
        }
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fleetlink")
            .join("config.toml")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("failed to parse config file {0}: {1}")]
    Parse(String, #[source] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.completion.check_interval_secs, 60);
        assert_eq!(cfg.database.connection_url(), "sqlite://./fleetlink.db?mode=rwc");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.database.path, "./fleetlink.db");
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/fleetlink.toml")).unwrap();
        assert_eq!(cfg.server.port, 8080);
    }
}
