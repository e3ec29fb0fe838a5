//! Configuration schema.
//!
//! Maps the YAML configuration file. Every field is optional; unset fields
//! fall back to environment, flags or built-in defaults when
//! [`Settings`](super::Settings) are resolved.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default environment variable holding the API token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of `config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Manifest location: an `http(s)://` URL or a file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,

    /// Installed-state file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    /// Base URL of the releases API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Name of the environment variable holding the API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// HTTP timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Asset suffixes that count as an installable binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_suffixes: Option<Vec<String>>,

    /// Shell command template run to install a package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,

    /// Shell command template run to update a package.
    /// Falls back to `install_command`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_command: Option<String>,
}
