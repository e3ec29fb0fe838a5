//! Manifest of tracked repositories.
//!
//! This module provides:
//! - [`RepoId`] - a validated `owner/name` repository identifier
//! - [`Manifest`] - line-oriented parsing of the manifest text
//! - [`ManifestSource`] - loading the manifest from a URL or a local file

pub mod repo_id;
pub mod source;

pub use repo_id::RepoId;
pub use source::ManifestSource;

/// One non-blank, non-comment line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based line number in the manifest text.
    pub line_number: usize,
    /// The trimmed line content.
    pub raw: String,
}

impl ManifestEntry {
    /// Create an entry from a raw line.
    pub fn new(line_number: usize, raw: impl Into<String>) -> Self {
        Self {
            line_number,
            raw: raw.into(),
        }
    }

    /// Parse the line into a repository identifier.
    pub fn repo_id(&self) -> crate::error::Result<RepoId> {
        self.raw.parse()
    }
}

/// A parsed manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// Blank lines and lines starting with `#` are skipped. Lines are not
    /// validated here; each one is parsed when it is reconciled so a bad
    /// line only affects itself.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(n, line)| ManifestEntry::new(n, line))
            .collect();

        Self { entries }
    }

    /// Entries in manifest order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Manifest {
    type Item = ManifestEntry;
    type IntoIter = std::vec::IntoIter<ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
