//! Installed-package state.
//!
//! [`InstalledState`] maps package names to the version the operator last
//! installed. It is loaded once per run, mutated only through
//! [`InstalledState::upsert`], and written back once by [`StateFile::save`].

pub mod store;

pub use store::{default_state_path, StateFile};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package name (unique key).
    pub name: String,
    /// Installed version tag.
    pub version: String,
}

/// Installed packages, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledState {
    packages: Vec<InstalledPackage>,
}

impl InstalledState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from stored entries.
    ///
    /// Later duplicates of a name overwrite earlier ones.
    pub fn from_packages(packages: Vec<InstalledPackage>) -> Self {
        let mut state = Self::new();
        for pkg in packages {
            state.upsert(&pkg.name, &pkg.version);
        }
        state
    }

    /// Installed version of a package.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.packages
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.version.as_str())
    }

    /// Record a package version.
    ///
    /// Existing entries keep their position; new ones are appended.
    pub fn upsert(&mut self, name: &str, version: &str) {
        match self.packages.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.version = version.to_string(),
            None => self.packages.push(InstalledPackage {
                name: name.to_string(),
                version: version.to_string(),
            }),
        }
    }

    /// Iterate over installed packages in order.
    pub fn iter(&self) -> impl Iterator<Item = &InstalledPackage> {
        self.packages.iter()
    }

    /// Snapshot of all entries, for saving.
    pub fn packages(&self) -> &[InstalledPackage] {
        &self.packages
    }

    /// Number of installed packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Name-to-version mapping, ignoring order.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.packages
            .iter()
            .map(|p| (p.name.clone(), p.version.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_missing_is_none() {
        let state = InstalledState::new();
        assert_eq!(state.lookup("widget"), None);
    }

    #[test]
    fn upsert_appends_new_entries() {
        let mut state = InstalledState::new();
        state.upsert("widget", "v1.0.0");
        state.upsert("gadget", "0.3");

        assert_eq!(state.lookup("widget"), Some("v1.0.0"));
        assert_eq!(state.lookup("gadget"), Some("0.3"));
        let names: Vec<_> = state.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["widget", "gadget"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut state = InstalledState::new();
        state.upsert("widget", "v1.0.0");
        state.upsert("gadget", "0.3");
        state.upsert("widget", "v2.0.0");

        assert_eq!(state.len(), 2);
        assert_eq!(state.packages()[0].name, "widget");
        assert_eq!(state.packages()[0].version, "v2.0.0");
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut once = InstalledState::new();
        once.upsert("gadget", "0.3");
        once.upsert("widget", "v2.0.0");

        let mut twice = once.clone();
        twice.upsert("widget", "v2.0.0");

        assert_eq!(once, twice);

        let mut fresh_twice = InstalledState::new();
        fresh_twice.upsert("gadget", "0.3");
        fresh_twice.upsert("widget", "v2.0.0");
        fresh_twice.upsert("widget", "v2.0.0");
        assert_eq!(once, fresh_twice);
    }

    #[test]
    fn from_packages_deduplicates() {
        let state = InstalledState::from_packages(vec![
            InstalledPackage {
                name: "widget".into(),
                version: "v1".into(),
            },
            InstalledPackage {
                name: "widget".into(),
                version: "v2".into(),
            },
        ]);
        assert_eq!(state.len(), 1);
        assert_eq!(state.lookup("widget"), Some("v2"));
    }

    #[test]
    fn to_map_ignores_order() {
        let mut a = InstalledState::new();
        a.upsert("widget", "v1");
        a.upsert("gadget", "v2");

        let mut b = InstalledState::new();
        b.upsert("gadget", "v2");
        b.upsert("widget", "v1");

        assert_ne!(a, b);
        assert_eq!(a.to_map(), b.to_map());
    }

    #[test]
    fn versions_are_opaque_strings() {
        let mut state = InstalledState::new();
        state.upsert("widget", "nightly-2024-01-01");
        assert_eq!(state.lookup("widget"), Some("nightly-2024-01-01"));
    }
}
