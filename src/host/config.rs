// Configuration module for SaveStorageSettings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// =============================================================================
// CONFIGURATION STRUCTURES
// =============================================================================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingSettings {
    /// Mirror log output to stdout
    #[serde(default)]
    pub console: bool,
    /// Log file path (relative to the mod directory or absolute). Empty = no file logging.
    #[serde(default)]
    pub log_file: String,
}

/// Where settings files are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Folder created under the game's save-data directory
    #[serde(default = "default_folder_name")]
    pub folder_name: String,
}

fn default_folder_name() -> String {
    "SaveStorageSettings".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            folder_name: default_folder_name(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

// =============================================================================
// CONFIG LOADING
// =============================================================================

#[derive(Debug)]
pub enum ConfigError {
    ReadError(std::io::Error),
    ParseError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub const CONFIG_FILENAME: &'static str = "save_storage_settings.toml";

    /// Load configuration from the file next to the mod library
    ///
    /// A missing file yields the defaults.
    pub fn load(mod_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = mod_dir.join(Self::CONFIG_FILENAME);

        debug!(
            path = %config_path.display(),
            "[config] Looking for config"
        );

        if !config_path.exists() {
            debug!("[config] No config found, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents).map_err(ConfigError::ParseError)?;
        info!(
            path = %config_path.display(),
            "[config] Loaded config"
        );
        Ok(config)
    }

    /// Resolve the log file against the mod directory; `None` disables file logging
    pub fn log_file_path(&self, mod_dir: &Path) -> Option<PathBuf> {
        if self.logging.log_file.is_empty() {
            return None;
        }
        let path = PathBuf::from(&self.logging.log_file);
        if path.is_absolute() {
            Some(path)
        } else {
            Some(mod_dir.join(path))
        }
    }

    /// Root folder of every saved settings file
    pub fn base_directory(&self, save_data_dir: &Path) -> PathBuf {
        let name = self.storage.folder_name.trim();
        if name.is_empty() {
            save_data_dir.join(default_folder_name())
        } else {
            save_data_dir.join(name)
        }
    }
}
