//! Host module - config, logging and the settings-file store

pub mod config;
pub mod logging;
pub mod store;

pub use config::{Config, ConfigError};
pub use logging::init_logging;
pub use store::{SavedFile, SettingsKind, SettingsStore, StoreError};
