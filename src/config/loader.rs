//! Configuration file discovery and loading.

use crate::config::schema::ConfigFile;
use crate::error::{ReltrackError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config location: `~/.reltrack/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".reltrack").join("config.yml"))
}

/// Load configuration.
///
/// An explicitly requested file must exist. Without one, the default
/// location is tried and a missing file yields defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        tracing::debug!("Loading config from {}", path.display());
        return load_config_file(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path)
        }
        _ => Ok(ConfigFile::default()),
    }
}

/// Load and parse a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReltrackError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReltrackError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content; `source_path` is used for error reporting.
///
/// An empty document is treated as an empty mapping.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ConfigFile> {
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(content).map_err(|e| ReltrackError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
