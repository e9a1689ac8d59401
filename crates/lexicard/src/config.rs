//! Configuration management for lexicard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::card::DEFAULT_OWNER;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "lexicard";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "cards.db";

/// Longest accepted search debounce.
const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LEXICARD_`, nested with `__`)
/// 2. TOML config file at `~/.config/lexicard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Deck configuration.
    pub deck: DeckConfig,
    /// Search configuration.
    pub search: SearchConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/lexicard/cards.db`
    pub database_path: Option<PathBuf>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Deck-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Owner used when a request names no user.
    pub default_owner: String,
}

/// Search-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Delay before typed search input is applied, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            default_owner: DEFAULT_OWNER.to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("LEXICARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server.host must not be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.deck.default_owner.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "deck.default_owner must not be empty".to_string(),
            });
        }

        if self.search.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "search.debounce_ms ({}) cannot be greater than {MAX_DEBOUNCE_MS}",
                    self.search.debounce_ms
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the socket address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!(
                    "invalid server address {}:{}",
                    self.server.host, self.server.port
                ),
            })
    }

    /// Get the search debounce delay as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.deck.default_owner, DEFAULT_OWNER);
        assert_eq!(config.search.debounce_ms, 300);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.port"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.host"));
    }

    #[test]
    fn test_validate_blank_default_owner() {
        let mut config = Config::default();
        config.deck.default_owner = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_owner"));
    }

    #[test]
    fn test_validate_debounce_too_long() {
        let mut config = Config::default();
        config.search.debounce_ms = 60_000;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("debounce_ms"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config.database_path().to_string_lossy().contains("cards.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_bind_addr_invalid_host() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_debounce() {
        assert_eq!(Config::default().debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("lexicard"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "lexicard_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[server]\nport = 9191\n\n[deck]\ndefault_owner = \"maria\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.deck.default_owner, "maria");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_server_config_deserialize() {
        let json = r#"{"port": 3000}"#;
        let server: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(server.port, 3000);
        assert_eq!(server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("default_owner"));
        assert!(json.contains("debounce_ms"));
    }
}
