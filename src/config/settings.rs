//! Resolved runtime settings.
//!
//! Precedence, lowest first: built-in defaults, config file, environment
//! (`RELTRACK_*`, applied by clap to the flag values), command-line flags.
//! The API token is read exactly once here and then passed explicitly.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::schema::{ConfigFile, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ENV};
use crate::error::{ReltrackError, Result};
use crate::installer::{CommandInstaller, Installer, RecordOnly};
use crate::manifest::ManifestSource;
use crate::release::{AssetMatcher, ClientConfig, DEFAULT_API_URL, DEFAULT_BINARY_SUFFIXES};
use crate::state::default_state_path;

/// Values supplied on the command line (or through their env fallbacks).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub manifest: Option<String>,
    pub state_file: Option<PathBuf>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Final settings for a run.
#[derive(Clone)]
pub struct Settings {
    /// Where the manifest comes from, if configured anywhere.
    pub manifest: Option<ManifestSource>,
    pub state_file: PathBuf,
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub binary_suffixes: Vec<String>,
    pub install_command: Option<String>,
    pub update_command: Option<String>,
}

impl Settings {
    /// Resolve settings, reading the token from the process environment.
    pub fn resolve(overrides: &Overrides, file: &ConfigFile) -> Result<Self> {
        Self::resolve_with_env(overrides, file, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup.
    pub fn resolve_with_env<F>(overrides: &Overrides, file: &ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let manifest = overrides
            .manifest
            .as_deref()
            .or(file.manifest.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ManifestSource::parse);

        let state_file = state_file_or(overrides, file, default_state_path)?;

        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| file.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let token_env = file.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV);
        let token = env(token_env).filter(|t| !t.trim().is_empty());
        if token.is_none() {
            tracing::debug!("No token in {}; using unauthenticated requests", token_env);
        }

        let binary_suffixes = file.binary_suffixes.clone().unwrap_or_else(|| {
            DEFAULT_BINARY_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        let settings = Self {
            manifest,
            state_file,
            api_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
            binary_suffixes,
            install_command: file.install_command.clone(),
            update_command: file.update_command.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(ReltrackError::ConfigValidationError {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        if self.binary_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(ReltrackError::ConfigValidationError {
                message: "binary_suffixes must not contain empty entries".to_string(),
            });
        }
        if self.api_url.trim().is_empty() {
            return Err(ReltrackError::ConfigValidationError {
                message: "api_url must not be empty".to_string(),
            });
        }
        if self.update_command.is_some() && self.install_command.is_none() {
            return Err(ReltrackError::ConfigValidationError {
                message: "update_command requires install_command".to_string(),
            });
        }
        Ok(())
    }

    /// The manifest source, which `check` cannot run without.
    pub fn require_manifest(&self) -> Result<&ManifestSource> {
        self.manifest
            .as_ref()
            .ok_or_else(|| ReltrackError::ConfigValidationError {
                message: "no manifest configured (use --manifest, RELTRACK_MANIFEST or `manifest:` in config.yml)"
                    .to_string(),
            })
    }

    /// HTTP client settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            timeout: self.timeout,
            ..ClientConfig::default()
        }
    }

    /// Matcher for the configured suffixes.
    pub fn asset_matcher(&self) -> AssetMatcher {
        AssetMatcher::new(self.binary_suffixes.iter().cloned())
    }

    /// The installer to run on confirmed actions.
    pub fn installer(&self) -> Box<dyn Installer> {
        match &self.install_command {
            Some(install) => Box::new(CommandInstaller::new(
                install.clone(),
                self.update_command.clone(),
            )),
            None => Box::new(RecordOnly),
        }
    }
}

/// Pick the state file; `fallback` supplies the home-based default.
fn state_file_or<F>(overrides: &Overrides, file: &ConfigFile, fallback: F) -> Result<PathBuf>
where
    F: FnOnce() -> Option<PathBuf>,
{
    overrides
        .state_file
        .clone()
        .or_else(|| file.state_file.clone())
        .or_else(fallback)
        .ok_or_else(|| ReltrackError::ConfigValidationError {
            message: "cannot determine home directory; set state_file or --state".to_string(),
        })
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("manifest", &self.manifest)
            .field("state_file", &self.state_file)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("binary_suffixes", &self.binary_suffixes)
            .field("install_command", &self.install_command)
            .field("update_command", &self.update_command)
            .finish()
    }
}
