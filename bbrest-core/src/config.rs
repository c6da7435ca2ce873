//! Client configuration management.
//!
//! Holds the server address, the server password, and logging preferences.
//! Configuration is persisted as TOML on disk. The client reads it once at
//! construction; nothing in the request pipeline mutates it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, HTTPS_TUNNEL_HOSTS};
use crate::error::{BbError, BbResult};

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server connection configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// BlueBubbles server URL (e.g., "https://abc123.trycloudflare.com").
    #[serde(default)]
    pub address: String,

    /// Server password, sent as a query parameter on every request.
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("address", &self.address)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Create a server config from an address and password.
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            password: password.into(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, only console logging is installed.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output for the file layer.
    #[serde(default)]
    pub json_output: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> BbResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> BbResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> BbResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> BbResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BbError::Config("could not determine config directory".into()))?;
        Ok(config_dir.join(APP_NAME).join("config.toml"))
    }

    /// Check whether the server connection is configured.
    pub fn is_server_configured(&self) -> bool {
        !self.server.address.is_empty() && !self.server.password.is_empty()
    }

    /// Sanitize and normalize a server address.
    ///
    /// Ensures the address has a scheme, strips trailing slashes,
    /// and applies https for known tunnel providers.
    pub fn sanitize_server_address(address: &str) -> String {
        let trimmed = address.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else if HTTPS_TUNNEL_HOSTS.iter().any(|host| trimmed.contains(host)) {
            format!("https://{trimmed}")
        } else {
            format!("http://{trimmed}")
        };

        with_scheme.trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_empty());
        assert!(!config.is_server_configured());
    }

    #[test]
    fn test_sanitize_server_address() {
        assert_eq!(
            AppConfig::sanitize_server_address("abc123.trycloudflare.com"),
            "https://abc123.trycloudflare.com"
        );
        assert_eq!(
            AppConfig::sanitize_server_address("http://192.168.1.100:1234/"),
            "http://192.168.1.100:1234"
        );
        assert_eq!(
            AppConfig::sanitize_server_address("  \"https://example.com/\"  "),
            "https://example.com"
        );
        assert_eq!(
            AppConfig::sanitize_server_address("192.168.1.5:1234"),
            "http://192.168.1.5:1234"
        );
        assert_eq!(AppConfig::sanitize_server_address("   "), "");
    }

    #[test]
    fn test_debug_redacts_password() {
        let server = ServerConfig::new("http://localhost:1234", "hunter2");
        let printed = format!("{server:?}");
        assert!(printed.contains("localhost"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.server = ServerConfig::new("http://10.0.0.2:1234", "secret");
        config.logging.json_output = true;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.server.address, "http://10.0.0.2:1234");
        assert_eq!(loaded.server.password, "secret");
        assert!(loaded.logging.json_output);
        assert!(loaded.is_server_configured());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[server]\naddress = \"host:1\"\n").unwrap();
        assert_eq!(config.server.address, "host:1");
        assert!(config.server.password.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\naddress = 1").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(BbError::Config(_))
        ));
    }
}
