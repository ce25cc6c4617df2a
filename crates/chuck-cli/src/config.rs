//! Chuck CLI Configuration Management
//!
//! Configuration is read from an optional TOML file and then overridden by
//! command line flags:
//!
//! ```toml
//! [api]
//! base_url = "https://api.chucknorris.io/"
//!
//! [storage]
//! data_dir = "/home/me/.local/share/chuck"
//!
//! [cli]
//! verbose = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use chuck_core::ChuckConfig;

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the CLI: the core sections plus CLI settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Core service configuration (`[api]` and `[storage]`)
    #[serde(flatten)]
    pub core: ChuckConfig,

    /// CLI-specific configuration
    pub cli: CliConfig,
}

/// CLI-specific configuration options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Enable verbose logging output
    pub verbose: bool,
}

// ----------------------------------------------------------------------------
// Configuration Loading Logic
// ----------------------------------------------------------------------------

impl AppConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = read_document(path.as_ref())
            .map_err(|e| ConfigError::Loading(format!("{:#}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides on top of file values
    pub fn apply_overrides(
        &mut self,
        data_dir: Option<&str>,
        api_url: Option<&str>,
        verbose: bool,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = data_dir {
            self.core.storage.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = api_url {
            self.core.api.base_url = url.to_string();
        }
        self.cli.verbose |= verbose;

        self.validate()
    }

    /// Data directory, defaulting to the platform data dir
    pub fn fill_default_data_dir(&mut self) {
        if self.core.storage.data_dir.is_none() {
            self.core.storage.data_dir = default_data_dir();
        }
    }

    /// Save configuration to a specific file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::FileSystem(format!("Failed to create config directory: {}", e)))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), toml_string)
            .map_err(|e| ConfigError::FileSystem(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.core
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

fn read_document(path: &Path) -> anyhow::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// `<platform data dir>/chuck`, if the platform has one
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("chuck"))
}

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
