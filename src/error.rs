//! Error types for reltrack operations.
//!
//! This module defines [`ReltrackError`], the closed set of error kinds used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-item errors ([`ReltrackError::Resolution`],
//!   [`ReltrackError::MalformedIdentifier`]) are contained inside the
//!   reconciliation loop and reported to the operator
//! - Everything else aborts the run before or after the loop
//! - Use `anyhow::Error` (via `ReltrackError::Other`) for unexpected errors

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single repository could not be resolved to a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// Network failure or unexpected HTTP status.
    Transient,
    /// Response body did not have the expected structure.
    Malformed,
}

impl fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Malformed => write!(f, "malformed response"),
        }
    }
}

/// Core error type for reltrack operations.
#[derive(Debug, Error)]
pub enum ReltrackError {
    /// The release-hosting service cannot be reached at all.
    #[error("Cannot reach {url}: {message}")]
    Connectivity { url: String, message: String },

    /// Resolving the latest release of one repository failed.
    #[error("Failed to resolve release for {repo} ({kind}): {message}")]
    Resolution {
        repo: String,
        kind: ResolutionKind,
        message: String,
    },

    /// A manifest line is not of the form `owner/name`.
    #[error("Malformed repository identifier '{line}': {reason}")]
    MalformedIdentifier { line: String, reason: String },

    /// The installed-state file exists but could not be decoded.
    #[error("Failed to parse state at {path}: {message}")]
    StateParseError { path: PathBuf, message: String },

    /// The installed-state file could not be written.
    #[error("Failed to save state to {path}: {message}")]
    StateSaveError { path: PathBuf, message: String },

    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReltrackError {
    /// Whether this error must abort the run.
    ///
    /// Resolution and identifier errors only affect a single manifest entry.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Resolution { .. } | Self::MalformedIdentifier { .. }
        )
    }

    /// Shorthand for a transient resolution failure.
    pub fn transient(repo: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            repo: repo.into(),
            kind: ResolutionKind::Transient,
            message: message.into(),
        }
    }

    /// Shorthand for a malformed-response resolution failure.
    pub fn malformed(repo: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            repo: repo.into(),
            kind: ResolutionKind::Malformed,
            message: message.into(),
        }
    }
}

/// Result type alias for reltrack operations.
pub type Result<T> = std::result::Result<T, ReltrackError>;
