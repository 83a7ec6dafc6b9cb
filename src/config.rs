//! Configuration management for farmdesk
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_GENERATED, DEFAULT_PUBLIC_KEY_ENV, DEFAULT_UPCOMING_WINDOW_DAYS, MAX_TIMEOUT_SECS, MAX_UPCOMING_WINDOW_DAYS,
};
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
}

/// Record store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store adapter: "http" or "memory"
    pub backend: String,
    /// Base URL of the hosted record service
    pub base_url: String,
    /// Project identifier sent with every request
    pub project_id: String,
    /// Name of the environment variable holding the public key
    pub public_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to a file
    pub enabled: bool,
    /// Minimum level: error, warn, info, debug or trace
    pub level: String,
    /// Log file path; defaults to the data directory
    pub file: Option<PathBuf>,
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Days ahead covered by the upcoming tasks list
    pub upcoming_window_days: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            base_url: "https://api.apper.io".to_string(),
            project_id: String::new(),
            public_key_env: DEFAULT_PUBLIC_KEY_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
        }
    }
}

impl StoreConfig {
    /// Read the public key from the configured environment variable
    pub fn public_key(&self) -> Option<String> {
        std::env::var(&self.public_key_env).ok().filter(|key| !key.is_empty())
    }
}

impl LoggingConfig {
    /// Parsed log level filter
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        self.level
            .parse::<log::LevelFilter>()
            .map_err(|_| anyhow::anyhow!("Invalid logging level '{}'", self.level))
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration, writing the default file to the XDG config
    /// directory on first run when no file exists yet.
    pub fn load_or_init() -> Result<Self> {
        if Self::find_config_file()?.is_some() {
            return Self::load();
        }

        let path = Self::get_default_config_path()?;
        if let Err(e) = Self::generate_default_config(&path) {
            eprintln!("⚠️ Could not write default configuration: {:#}", e);
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("farmdesk.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("farmdesk").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.validate_store()?;

        self.logging.level_filter()?;

        let window = self.dashboard.upcoming_window_days;
        if !(1..=MAX_UPCOMING_WINDOW_DAYS).contains(&window) {
            anyhow::bail!(
                "upcoming_window_days must be between 1 and {}, got {}",
                MAX_UPCOMING_WINDOW_DAYS,
                window
            );
        }

        Ok(())
    }

    /// Validate the store section
    fn validate_store(&self) -> Result<()> {
        let store = &self.store;
        match store.backend.as_str() {
            "memory" => {}
            "http" => {
                if !(store.base_url.starts_with("http://") || store.base_url.starts_with("https://")) {
                    anyhow::bail!("base_url must start with http:// or https://, got '{}'", store.base_url);
                }
                if store.public_key_env.is_empty() {
                    anyhow::bail!("public_key_env cannot be empty");
                }
            }
            backend => {
                anyhow::bail!("unsupported store backend '{}' (expected \"http\" or \"memory\")", backend);
            }
        }

        if store.timeout_secs == 0 || store.timeout_secs > MAX_TIMEOUT_SECS {
            anyhow::bail!(
                "timeout_secs must be between 1 and {}, got {}",
                MAX_TIMEOUT_SECS,
                store.timeout_secs
            );
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# farmdesk Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(datetime::DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("farmdesk"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
