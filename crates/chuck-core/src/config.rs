//! Configuration for the Chuck core services
//!
//! All sections deserialize with defaults, so a partial TOML document (or none
//! at all) yields a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{ChuckError, Result, StorageError};

/// Public Chuck Norris joke API
pub const DEFAULT_API_BASE_URL: &str = "https://api.chucknorris.io/";

/// Preference document name inside the data directory
pub const DEFAULT_PREFERENCES_FILE: &str = "user_preferences.json";

// ----------------------------------------------------------------------------
// Configuration Sections
// ----------------------------------------------------------------------------

/// Complete configuration for the core services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChuckConfig {
    /// Joke API client settings
    pub api: ApiConfig,
    /// Credential persistence settings
    pub storage: StorageConfig,
}

/// Joke API client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against
    pub base_url: String,
    /// User-Agent header sent with each request
    pub user_agent: String,
}

/// Credential persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the preference document (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Preference document file name
    pub file_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: concat!("chuck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: DEFAULT_PREFERENCES_FILE.to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
// Validation and Resolution
// ----------------------------------------------------------------------------

impl ApiConfig {
    /// Parse the base URL, normalizing it to end with `/` so endpoint paths
    /// are appended rather than replacing the last segment
    pub fn parsed_base_url(&self) -> core::result::Result<Url, url::ParseError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
    }
}

impl StorageConfig {
    /// Directory the preference document lives in
    pub fn resolve_data_dir(&self) -> core::result::Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".chuck"))
                .ok_or(StorageError::NotAvailable),
        }
    }
}

impl ChuckConfig {
    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<()> {
        let base = self.api.parsed_base_url().map_err(|e| {
            ChuckError::config_error(format!("Invalid API base URL '{}': {}", self.api.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(ChuckError::config_error(format!(
                "API base URL '{}' cannot be used as a base",
                self.api.base_url
            )));
        }

        if self.storage.file_name.trim().is_empty() {
            return Err(ChuckError::config_error("Preference file name must not be empty"));
        }

        Ok(())
    }
}
