//! The reconciliation decision table.

use std::fmt;

/// What to do about one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Not installed; a release exists.
    Install { latest: String },
    /// Installed at a different version than the latest release.
    Update { installed: String, latest: String },
    /// Installed version equals the latest tag.
    UpToDate { version: String },
    /// Nothing is published, so there is nothing to install.
    NoRelease,
}

impl Action {
    /// Whether carrying out this action changes installed state.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Install { .. } | Self::Update { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install { latest } => write!(f, "install {}", latest),
            Self::Update { installed, latest } => write!(f, "update {} → {}", installed, latest),
            Self::UpToDate { version } => write!(f, "up to date ({})", version),
            Self::NoRelease => write!(f, "no release"),
        }
    }
}

/// Decide the action for an installed version and a release tag.
///
/// Tags are opaque: only equality matters, never ordering. An equal
/// installed version wins over everything else; otherwise an empty tag
/// means no release and nothing is done.
pub fn decide(installed: Option<&str>, tag: &str) -> Action {
    match installed {
        Some(version) if version == tag => Action::UpToDate {
            version: version.to_string(),
        },
        _ if tag.is_empty() => Action::NoRelease,
        None => Action::Install {
            latest: tag.to_string(),
        },
        Some(version) => Action::Update {
            installed: version.to_string(),
            latest: tag.to_string(),
        },
    }
}
