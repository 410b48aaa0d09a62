//! Configuration module for bulksel
//!
//! Manages application configuration: where the lead store lives, the page
//! size list views fetch with, and output defaults. Configuration is stored
//! in the user's config directory and can be overridden per run with
//! `BULKSEL_*` environment variables.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_PAGE_SIZE: usize = 25;

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

const fn default_true() -> bool {
    true
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path of the lead store; defaults to the user's data directory
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Rows fetched per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Ask before running bulk actions
    #[serde(default = "default_true")]
    pub confirm_bulk: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: None,
            page_size: DEFAULT_PAGE_SIZE,
            quiet: false,
            confirm_bulk: true,
        }
    }
}

impl AppConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("bulksel").join("config.toml"))
    }

    /// Load configuration, creating a default file if none exists
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, layered with environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the values do not parse.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("BULKSEL"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be determined or
    /// the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Set the lead store path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if saving the configuration fails.
    pub fn set_database(&mut self, path: PathBuf) -> Result<(), ConfigError> {
        self.database = Some(path);
        self.save()
    }

    /// Set the page size
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `page_size` is zero or saving fails.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ConfigError> {
        self.page_size = page_size;
        self.validate()?;
        self.save()
    }

    /// Resolve the lead store path, falling back to the user's data directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the data directory
    /// cannot be determined.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("bulksel").join("leads.db"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Message(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
