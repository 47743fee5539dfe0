//! Application configuration.
//!
//! Values come from an optional JSON file, then environment overrides
//! (`QUOTEBOOK_DB_PATH`, `QUOTEBOOK_LOG`, `QUOTEBOOK_EXPORT_NAME`).

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::DEFAULT_EXPORT_NAME;
use crate::util::normalize_text_option;

const APP_DIR_NAME: &str = "quotebook";
const DATABASE_FILE_NAME: &str = "quotebook.db";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_LOG_FILTER: &str = "quotebook=info";

const DB_PATH_VAR: &str = "QUOTEBOOK_DB_PATH";
const LOG_VAR: &str = "QUOTEBOOK_LOG";
const EXPORT_NAME_VAR: &str = "QUOTEBOOK_EXPORT_NAME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// `SQLite` database file
    pub database_path: PathBuf,
    /// Default `tracing` directive, used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Document name offered for plain-text exports
    pub export_document_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            export_document_name: DEFAULT_EXPORT_NAME.to_string(),
        }
    }
}

/// Platform data directory for the app, or the working directory if unknown
fn app_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR_NAME))
}

pub fn default_database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE_NAME)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR_NAME))
        .join(CONFIG_FILE_NAME)
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Defaults overridden by whatever `lookup` returns.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::default().with_lookup(lookup)
    }

    /// The default config file (if any) with environment overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&default_config_path())?.with_env()
    }

    /// Read a JSON config file; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str::<Self>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let serialized = serde_json::to_string_pretty(self).map_err(|source| {
            ConfigError::Invalid(format!("failed to serialize config: {source}"))
        })?;
        std::fs::write(path, serialized).map_err(write_error)
    }

    fn with_env(self) -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        self.with_lookup(|name| values.get(name).cloned())
    }

    fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(path) = optional_trimmed(&lookup, DB_PATH_VAR) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(filter) = optional_trimmed(&lookup, LOG_VAR) {
            self.log_filter = filter;
        }
        if let Some(name) = optional_trimmed(&lookup, EXPORT_NAME_VAR) {
            self.export_document_name = name;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database_path must not be empty".to_string(),
            ));
        }
        if self.export_document_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "export_document_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    normalize_text_option(lookup(name))
}
