//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{APP_NAME, CONFIG_DIR_ENV};
use crate::track_sizes::BucketRule;

/// Catalog data settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory holding the collection JSON files
    pub data_dir: PathBuf,
    /// Width bucket rule for the compatibility chart
    pub bucket_rule: BucketRule,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        // Keep catalog data next to the config file by default
        let data_dir = Config::config_dir()
            .map(|dir| dir.join("data"))
            .unwrap_or_else(|_| PathBuf::from("data"));

        Self {
            data_dir,
            bucket_rule: BucketRule::default(),
        }
    }
}

/// Web API server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Admin area settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Hex SHA-256 digest of the admin password. Admin login is disabled when unset.
    #[serde(default)]
    pub password_sha256: Option<String>,
    /// How long an admin session stays valid
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u32,
}

fn default_session_ttl() -> u32 {
    480
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password_sha256: None,
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default cap on machine search results shown by the CLI
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 50 }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/TrackFinder/config.toml`
/// - macOS: `~/Library/Application Support/TrackFinder/config.toml`
/// - Windows: `%APPDATA%\TrackFinder\config.toml`
///
/// `TRACKFINDER_CONFIG_DIR` replaces the directory when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog data settings
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Web API settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Admin settings
    #[serde(default)]
    pub admin: AdminConfig,
    /// Search settings
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = Self::config_file_path()?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - `data_dir` is not empty
    /// - `host` is not empty and `port` is not 0
    /// - `password_sha256`, if set, is a 64 character hex digest
    /// - `session_ttl_minutes` and `max_results` are positive
    pub fn validate(&self) -> Result<()> {
        if self.catalog.data_dir.as_os_str().is_empty() {
            anyhow::bail!("catalog.data_dir cannot be empty");
        }

        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be between 1 and 65535");
        }

        if let Some(digest) = &self.admin.password_sha256 {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                anyhow::bail!("admin.password_sha256 must be a 64 character hex SHA-256 digest");
            }
        }
        if self.admin.session_ttl_minutes == 0 {
            anyhow::bail!("admin.session_ttl_minutes must be at least 1");
        }

        if self.search.max_results == 0 {
            anyhow::bail!("search.max_results must be at least 1");
        }

        Ok(())
    }

    /// Sets the data directory with validation.
    pub fn set_data_dir(&mut self, path: PathBuf) -> Result<()> {
        self.catalog.data_dir = path;
        self.validate()
    }

    /// Whether admin login is possible.
    #[must_use]
    pub fn admin_enabled(&self) -> bool {
        self.admin.password_sha256.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.catalog.bucket_rule, BucketRule::Truncate);
        assert_eq!(config.search.max_results, 50);
        assert!(!config.admin_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_rejects_bad_values() {
        let mut config = Config::new();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.admin.password_sha256 = Some("not-a-digest".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.admin.password_sha256 = Some("a".repeat(64));
        assert!(config.validate().is_ok());

        let mut config = Config::new();
        assert!(config.set_data_dir(PathBuf::new()).is_err());
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let content = r#"
            [catalog]
            data_dir = "/srv/trackfinder"
            bucket_rule = "nearest"
        "#;

        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.catalog.data_dir, PathBuf::from("/srv/trackfinder"));
        assert_eq!(config.catalog.bucket_rule, BucketRule::Nearest);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.admin.session_ttl_minutes, 480);
    }

    #[test]
    fn test_config_partial_section_uses_defaults() {
        let config: Config = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");

        let mut config = Config::new();
        config.catalog.data_dir = temp_dir.path().join("data");
        config.server.port = 8080;

        // Manually save to temp location for testing
        let content = toml::to_string_pretty(&config).unwrap();
        fs::write(&config_file, content).unwrap();

        let content = fs::read_to_string(&config_file).unwrap();
        let loaded: Config = toml::from_str(&content).unwrap();
        assert_eq!(loaded, config);
    }
}
