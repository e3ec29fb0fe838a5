//! Repository identifiers.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ReltrackError;

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid segment regex"));

/// A repository identifier of the form `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    /// Create an identifier from validated segments.
    pub fn new(owner: &str, name: &str) -> crate::error::Result<Self> {
        format!("{}/{}", owner, name).parse()
    }

    /// The owner segment.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repository name segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package name tracked in installed state.
    pub fn package_name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoId {
    type Err = ReltrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| ReltrackError::MalformedIdentifier {
            line: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split('/').collect();
        match parts.as_slice() {
            [_] => Err(malformed("missing '/' separator")),
            [owner, name] => {
                for segment in [owner, name] {
                    if segment.is_empty() {
                        return Err(malformed("empty segment"));
                    }
                    if *segment == "." || *segment == ".." {
                        return Err(malformed("relative path segment"));
                    }
                    if !SEGMENT.is_match(segment) {
                        return Err(malformed("invalid characters"));
                    }
                }
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(malformed("expected exactly 'owner/name'")),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
