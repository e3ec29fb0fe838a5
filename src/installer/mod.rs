//! Install and update capabilities.
//!
//! The reconciliation engine calls an [`Installer`] only after the operator
//! confirmed the action. Implementations:
//! - [`RecordOnly`] - no side effects; the new version is only recorded
//! - [`CommandInstaller`] - runs configured shell command templates
//! - [`MockInstaller`] - captures calls for tests

pub mod command;
pub mod mock;

pub use command::CommandInstaller;
pub use mock::{InstallCall, MockInstaller};

use crate::error::Result;
use crate::manifest::RepoId;

/// What to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    /// Source repository.
    pub repo: RepoId,
    /// Package name derived from the repository.
    pub name: String,
    /// Target release tag.
    pub version: String,
    /// Recognized binary asset of the release, if any.
    pub asset: Option<String>,
}

/// Performs installs and updates.
///
/// An `Err` means the package was not installed; the engine then leaves the
/// recorded state untouched.
pub trait Installer {
    /// Install a package that is not yet recorded.
    fn install(&mut self, pkg: &PackageRef) -> Result<()>;

    /// Move a recorded package from `from` to `pkg.version`.
    fn update(&mut self, pkg: &PackageRef, from: &str) -> Result<()>;
}

/// Installer that only records versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordOnly;

impl Installer for RecordOnly {
    fn install(&mut self, pkg: &PackageRef) -> Result<()> {
        tracing::debug!("Recording {} {} as installed", pkg.name, pkg.version);
        Ok(())
    }

    fn update(&mut self, pkg: &PackageRef, from: &str) -> Result<()> {
        tracing::debug!("Recording {} {} -> {}", pkg.name, from, pkg.version);
        Ok(())
    }
}
