//! Persistent state storage.
//!
//! The state file is JSON:
//!
//! ```json
//! {
//!   "updated_at": "2024-05-01T12:00:00Z",
//!   "packages": [{ "name": "widget", "version": "v2.0.0" }]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{InstalledPackage, InstalledState};
use crate::error::{ReltrackError, Result};

/// Default location of the state file: `~/.reltrack/installed.json`.
///
/// `None` when no home directory can be determined.
pub fn default_state_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".reltrack").join("installed.json"))
}

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    packages: Vec<InstalledPackage>,
}

/// Loads and saves [`InstalledState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Create a state file handle.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load state from disk.
    ///
    /// A missing file is an empty state.
    pub fn load(&self) -> Result<InstalledState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No state at {}, starting empty", self.path.display());
                return Ok(InstalledState::new());
            }
            Err(e) => return Err(e.into()),
        };

        let doc: StateDocument =
            serde_json::from_str(&content).map_err(|e| ReltrackError::StateParseError {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        Ok(InstalledState::from_packages(doc.packages))
    }

    /// Save state to disk using atomic write.
    ///
    /// Writes to a temp file next to the target and renames it over the
    /// previous snapshot, so the file always holds a complete snapshot.
    pub fn save(&self, state: &InstalledState) -> Result<()> {
        let save_error = |message: String| ReltrackError::StateSaveError {
            path: self.path.clone(),
            message,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| save_error(e.to_string()))?;
        }

        let doc = StateDocument {
            updated_at: Some(Utc::now()),
            packages: state.packages().to_vec(),
        };
        let content =
            serde_json::to_string_pretty(&doc).map_err(|e| save_error(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content).map_err(|e| save_error(e.to_string()))?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            fs::remove_file(&temp_path).ok();
            return Err(save_error(e.to_string()));
        }

        tracing::debug!(
            "Saved {} packages to {}",
            state.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_path_ends_with_installed_json() {
        if let Some(path) = default_state_path() {
            assert!(path.ends_with(".reltrack/installed.json"));
        }
    }

    #[test]
    fn load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path().join("installed.json"));
        let state = file.load().unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn load_corrupt_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        fs::write(&path, "{ not json").unwrap();

        let err = StateFile::new(&path).load().unwrap_err();
        assert!(matches!(err, ReltrackError::StateParseError { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn load_directory_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = StateFile::new(temp.path()).load().unwrap_err();
        assert!(matches!(err, ReltrackError::Io(_)));
    }

    #[test]
    fn load_accepts_packages_only_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        fs::write(
            &path,
            r#"{"packages":[{"name":"widget","version":"v1.0.0"}]}"#,
        )
        .unwrap();

        let state = StateFile::new(&path).load().unwrap();
        assert_eq!(state.lookup("widget"), Some("v1.0.0"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path().join("installed.json"));

        let mut state = InstalledState::new();
        state.upsert("widget", "v2.0.0");
        state.upsert("gadget", "0.3.1");
        file.save(&state).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded.to_map(), state.to_map());
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path().join("nested").join("dir").join("state.json"));
        file.save(&InstalledState::new()).unwrap();
        assert!(file.path().exists());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path().join("installed.json"));

        let mut first = InstalledState::new();
        first.upsert("widget", "v1.0.0");
        first.upsert("gadget", "0.1");
        file.save(&first).unwrap();

        let mut second = InstalledState::new();
        second.upsert("widget", "v2.0.0");
        file.save(&second).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.lookup("widget"), Some("v2.0.0"));
        assert!(!temp.path().join("installed.json.tmp").exists());
    }

    #[test]
    fn save_writes_updated_at() {
        let temp = TempDir::new().unwrap();
        let file = StateFile::new(temp.path().join("installed.json"));
        file.save(&InstalledState::new()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("updated_at"));
        assert!(content.contains("packages"));
    }

    #[test]
    fn save_to_unwritable_location_is_save_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let file = StateFile::new(blocker.join("installed.json"));
        let err = file.save(&InstalledState::new()).unwrap_err();
        assert!(matches!(err, ReltrackError::StateSaveError { .. }));
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("installed.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "occupied").unwrap();

        let err = StateFile::new(&target)
            .save(&InstalledState::new())
            .unwrap_err();

        assert!(matches!(err, ReltrackError::StateSaveError { .. }));
        assert!(!temp.path().join("installed.json.tmp").exists());
        assert!(target.join("keep").exists());
    }
}
