//! Settings-file store
//!
//! Every exported settings file lives at `<base>/<kind directory>/<name>.txt`.
//! The kind directory groups files that can be loaded into the same kind of
//! target, so a bill queue saved on one stove is offered on every stove.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

const FILE_EXTENSION: &str = "txt";

/// Characters the host filesystem rejects in a file name
const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

// =============================================================================
// SETTINGS KINDS
// =============================================================================

/// What a settings file was exported from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsKind {
    Stockpile,
    /// Shelves and other storage buildings, keyed by building definition
    StorageBuilding(String),
    Grave,
    OperationsHuman,
    OperationsAnimal,
    DrugPolicy,
    FoodRestriction,
    Outfit,
    /// A production bill queue, keyed by work table definition
    Workbench(String),
}

impl SettingsKind {
    pub fn directory_name(&self) -> String {
        match self {
            SettingsKind::Stockpile => "stockpiles".to_string(),
            SettingsKind::StorageBuilding(def_name) => def_name.clone(),
            SettingsKind::Grave => "graves".to_string(),
            SettingsKind::OperationsHuman => "operationsHuman".to_string(),
            SettingsKind::OperationsAnimal => "operationsAnimal".to_string(),
            SettingsKind::DrugPolicy => "drugPolicies".to_string(),
            SettingsKind::FoodRestriction => "foodRestrictions".to_string(),
            SettingsKind::Outfit => "outfits".to_string(),
            SettingsKind::Workbench(def_name) => workbench_directory(def_name),
        }
    }
}

/// Directory shared by work tables that offer the same recipes
pub fn workbench_directory(def_name: &str) -> String {
    match def_name {
        "" => "unknown".to_string(),
        "TableButcher" | "ButcherSpot" => "butcher".to_string(),
        "HandTailoringBench" | "ElectricTailoringBench" => "tailoringBench".to_string(),
        "FueledSmithy" | "ElectricSmithy" => "smithy".to_string(),
        "FueledStove" | "ElectricStove" => "stove".to_string(),
        _ => {
            let mut chars = def_name.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => "unknown".to_string(),
            }
        }
    }
}

/// Whether `name` can be used as a settings file name
pub fn is_valid_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| c.is_control() || INVALID_NAME_CHARS.contains(&c))
}

// =============================================================================
// STORE
// =============================================================================

/// Errors from locating a settings file
#[derive(Debug)]
pub enum StoreError {
    /// Name rejected by `is_valid_file_name`
    InvalidName(String),
    /// Directory could not be created
    IoError(io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidName(name) => write!(f, "Invalid file name: {:?}", name),
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(e) => Some(e),
            StoreError::InvalidName(_) => None,
        }
    }
}

/// A file shown in the load dialog
#[derive(Debug, Clone)]
pub struct SavedFile {
    /// File name without extension
    pub name: String,
    pub path: PathBuf,
    pub modified: DateTime<Local>,
}

impl SavedFile {
    pub fn modified_label(&self) -> String {
        self.modified.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    base_dir: PathBuf,
}

impl SettingsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn directory(&self, kind: &SettingsKind) -> PathBuf {
        self.base_dir.join(kind.directory_name())
    }

    /// Path of the file `name` for `kind`, creating its directory
    pub fn file_path(&self, kind: &SettingsKind, name: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_file_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        let dir = self.directory(kind);
        fs::create_dir_all(&dir).map_err(StoreError::IoError)?;
        Ok(dir.join(format!("{}.{}", name, FILE_EXTENSION)))
    }

    /// Saved files for `kind`, sorted by name
    pub fn list(&self, kind: &SettingsKind) -> io::Result<Vec<SavedFile>> {
        let dir = self.directory(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %dir.display(), "[store] No directory yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            files.push(SavedFile {
                name: name.to_string(),
                modified: DateTime::<Local>::from(metadata.modified()?),
                path,
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)?;
        info!(path = %path.display(), "[store] Deleted settings file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbench_directory() {
        assert_eq!(workbench_directory("ButcherSpot"), "butcher");
        assert_eq!(workbench_directory("TableButcher"), "butcher");
        assert_eq!(workbench_directory("ElectricTailoringBench"), "tailoringBench");
        assert_eq!(workbench_directory("FueledSmithy"), "smithy");
        assert_eq!(workbench_directory("ElectricStove"), "stove");
        assert_eq!(workbench_directory("TableMachining"), "tableMachining");
        assert_eq!(workbench_directory(""), "unknown");
    }

    #[test]
    fn test_directory_names() {
        assert_eq!(SettingsKind::Stockpile.directory_name(), "stockpiles");
        assert_eq!(
            SettingsKind::StorageBuilding("Shelf".to_string()).directory_name(),
            "Shelf"
        );
        assert_eq!(SettingsKind::OperationsAnimal.directory_name(), "operationsAnimal");
        assert_eq!(SettingsKind::DrugPolicy.directory_name(), "drugPolicies");
        assert_eq!(
            SettingsKind::Workbench("FueledStove".to_string()).directory_name(),
            "stove"
        );
    }

    #[test]
    fn test_valid_file_names() {
        assert!(is_valid_file_name("meals"));
        assert!(is_valid_file_name("Simple meals 2"));
        assert!(!is_valid_file_name(""));
        assert!(!is_valid_file_name("   "));
        assert!(!is_valid_file_name(".."));
        assert!(!is_valid_file_name("a/b"));
        assert!(!is_valid_file_name("a\\b"));
        assert!(!is_valid_file_name("what?"));
    }

    #[test]
    fn test_file_path_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());

        let path = store.file_path(&SettingsKind::Stockpile, "metals").unwrap();
        assert_eq!(path, dir.path().join("stockpiles").join("metals.txt"));
        assert!(dir.path().join("stockpiles").is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn test_file_path_rejects_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());

        let err = store
            .file_path(&SettingsKind::Stockpile, "../escape")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(!dir.path().join("stockpiles").exists());
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        assert!(store.list(&SettingsKind::Outfit).unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        let kind = SettingsKind::Workbench("ElectricStove".to_string());

        for name in ["survival", "lavish", "simple"] {
            let path = store.file_path(&kind, name).unwrap();
            fs::write(path, "Version:1.0\n").unwrap();
        }
        fs::create_dir(store.directory(&kind).join("nested")).unwrap();

        let files = store.list(&kind).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["lavish", "simple", "survival"]);
        assert_eq!(files[0].modified_label().len(), "2024-01-01 00:00".len());

        store.delete(&files[1].path).unwrap();
        let names: Vec<_> = store
            .list(&kind)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["lavish", "survival"]);
    }
}
