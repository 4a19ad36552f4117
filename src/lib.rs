// SaveStorageSettings - export and re-import colony settings for RimWorld

pub mod core;
pub mod host;

use std::path::Path;

use tracing::{error, info};

use crate::host::{init_logging, Config, SettingsStore};

/// Bring the mod up: config, logging, and the store the UI reads files from.
///
/// A broken config file is not fatal; the defaults are used and the error is
/// logged once logging is up.
pub fn start_mod(mod_dir: &Path, save_data_dir: &Path) -> SettingsStore {
    let (config, config_error) = match Config::load(mod_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(config.logging.console, config.log_file_path(mod_dir));

    if let Some(e) = config_error {
        error!(error = %e, "[mod] Config error, using defaults");
    }

    let store = SettingsStore::new(config.base_directory(save_data_dir));
    info!(
        path = %store.base_dir().display(),
        version = env!("CARGO_PKG_VERSION"),
        "[mod] SaveStorageSettings started"
    );
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_mod_uses_configured_folder() {
        let mod_dir = tempfile::tempdir().unwrap();
        let save_data = tempfile::tempdir().unwrap();
        std::fs::write(
            mod_dir.path().join(Config::CONFIG_FILENAME),
            "[storage]\nfolder_name = \"Exports\"\n",
        )
        .unwrap();

        let store = start_mod(mod_dir.path(), save_data.path());
        assert_eq!(store.base_dir(), save_data.path().join("Exports"));
    }

    #[test]
    fn test_start_mod_survives_broken_config() {
        let mod_dir = tempfile::tempdir().unwrap();
        let save_data = tempfile::tempdir().unwrap();
        std::fs::write(mod_dir.path().join(Config::CONFIG_FILENAME), "not toml [").unwrap();

        let store = start_mod(mod_dir.path(), save_data.path());
        assert_eq!(
            store.base_dir(),
            save_data.path().join("SaveStorageSettings")
        );
    }
}
