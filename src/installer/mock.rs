//! Mock installer for testing.
//!
//! # Example
//!
//! ```
//! use reltrack::installer::{InstallCall, Installer, MockInstaller, PackageRef};
//!
//! let mut installer = MockInstaller::new();
//! let pkg = PackageRef {
//!     repo: "octo/widget".parse().unwrap(),
//!     name: "widget".to_string(),
//!     version: "v2.0.0".to_string(),
//!     asset: None,
//! };
//! installer.install(&pkg).unwrap();
//!
//! assert_eq!(
//!     installer.calls(),
//!     &[InstallCall::Install { name: "widget".into(), version: "v2.0.0".into() }]
//! );
//! ```

use std::collections::HashSet;

use super::{Installer, PackageRef};
use crate::error::{ReltrackError, Result};

/// A captured installer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallCall {
    /// `install(name, version)`.
    Install { name: String, version: String },
    /// `update(name, version)` from a previous version.
    Update {
        name: String,
        from: String,
        version: String,
    },
}

/// Installer that records calls and can be told to fail.
#[derive(Debug, Default)]
pub struct MockInstaller {
    calls: Vec<InstallCall>,
    failing: HashSet<String>,
}

impl MockInstaller {
    /// Create a mock that succeeds for every package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make calls for `name` fail.
    pub fn fail_for(&mut self, name: &str) {
        self.failing.insert(name.to_string());
    }

    /// All captured calls, in order.
    pub fn calls(&self) -> &[InstallCall] {
        &self.calls
    }

    fn outcome(&self, name: &str) -> Result<()> {
        if self.failing.contains(name) {
            return Err(ReltrackError::CommandFailed {
                command: format!("install {}", name),
                code: Some(1),
            });
        }
        Ok(())
    }
}

impl Installer for MockInstaller {
    fn install(&mut self, pkg: &PackageRef) -> Result<()> {
        self.calls.push(InstallCall::Install {
            name: pkg.name.clone(),
            version: pkg.version.clone(),
        });
        self.outcome(&pkg.name)
    }

    fn update(&mut self, pkg: &PackageRef, from: &str) -> Result<()> {
        self.calls.push(InstallCall::Update {
            name: pkg.name.clone(),
            from: from.to_string(),
            version: pkg.version.clone(),
        });
        self.outcome(&pkg.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str) -> PackageRef {
        PackageRef {
            repo: format!("octo/{}", name).parse().unwrap(),
            name: name.to_string(),
            version: "v2".to_string(),
            asset: None,
        }
    }

    #[test]
    fn captures_calls_in_order() {
        let mut installer = MockInstaller::new();
        installer.install(&pkg("widget")).unwrap();
        installer.update(&pkg("gadget"), "v1").unwrap();

        assert_eq!(installer.calls().len(), 2);
        assert!(matches!(installer.calls()[1], InstallCall::Update { .. }));
    }

    #[test]
    fn fail_for_returns_error_but_records_call() {
        let mut installer = MockInstaller::new();
        installer.fail_for("widget");

        assert!(installer.install(&pkg("widget")).is_err());
        assert!(installer.install(&pkg("gadget")).is_ok());
        assert_eq!(installer.calls().len(), 2);
    }
}
