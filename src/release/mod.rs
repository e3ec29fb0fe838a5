//! Release resolution.
//!
//! This module provides:
//! - [`ReleaseInfo`] - the latest release tag and its asset names
//! - [`ReleaseResolver`] - the query capability used by the reconciliation engine
//! - [`GitHubClient`] - a resolver backed by the GitHub releases API
//! - [`AssetMatcher`] - binary availability classification by file suffix

pub mod assets;
pub mod client;

pub use assets::{AssetMatcher, Availability, DEFAULT_BINARY_SUFFIXES};
pub use client::{ClientConfig, GitHubClient, DEFAULT_API_URL};

use serde::Deserialize;

use crate::error::Result;
use crate::manifest::RepoId;

/// Metadata of a repository's latest release.
///
/// An empty `tag_name` means the repository has no published release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Opaque version tag, compared only for equality.
    pub tag_name: String,
    /// Asset names in the order reported by the server.
    pub assets: Vec<String>,
}

impl ReleaseInfo {
    /// Create release info.
    pub fn new(tag_name: impl Into<String>, assets: Vec<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            assets,
        }
    }

    /// The "no release published" value.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether a release exists.
    pub fn has_release(&self) -> bool {
        !self.tag_name.is_empty()
    }
}

/// Resolves a repository identifier to its latest release.
pub trait ReleaseResolver {
    /// Query the latest release.
    ///
    /// A repository without releases yields [`ReleaseInfo::none`], not an error.
    fn resolve(&self, repo: &RepoId) -> Result<ReleaseInfo>;
}

impl<T: ReleaseResolver + ?Sized> ReleaseResolver for &T {
    fn resolve(&self, repo: &RepoId) -> Result<ReleaseInfo> {
        (**self).resolve(repo)
    }
}

/// Wire format of the latest-release endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ReleasePayload {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<AssetPayload>,
}

#[derive(Debug, Deserialize)]
struct AssetPayload {
    name: String,
}

impl From<ReleasePayload> for ReleaseInfo {
    fn from(payload: ReleasePayload) -> Self {
        Self {
            tag_name: payload.tag_name.unwrap_or_default(),
            assets: payload.assets.into_iter().map(|a| a.name).collect(),
        }
    }
}
