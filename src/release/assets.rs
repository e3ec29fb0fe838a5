//! Binary availability checks.
//!
//! A release "has a binary" when one of its assets ends with a recognized
//! archive suffix. Assets are scanned in server order and the first match
//! wins, regardless of which suffix it matched.

use crate::release::ReleaseInfo;

/// Archive suffixes recognized when no others are configured.
pub const DEFAULT_BINARY_SUFFIXES: &[&str] = &[".zip", ".tar.gz"];

/// Result of checking a release for an installable binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    /// Whether a recognized binary asset exists.
    pub available: bool,
    /// The first matching asset, if any.
    pub matched_asset: Option<String>,
    /// All asset names, for diagnostics.
    pub asset_names: Vec<String>,
}

impl Availability {
    /// One-line description for operator output.
    pub fn describe(&self) -> String {
        match &self.matched_asset {
            Some(asset) => format!("binary: {}", asset),
            None if self.asset_names.is_empty() => "no binary asset (no assets)".to_string(),
            None => format!(
                "no binary asset (assets: {})",
                self.asset_names.join(", ")
            ),
        }
    }
}

/// Classifies release assets by file suffix.
#[derive(Debug, Clone)]
pub struct AssetMatcher {
    suffixes: Vec<String>,
}

impl AssetMatcher {
    /// Create a matcher for the given suffixes, in priority order.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured suffixes.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Check a release for a recognized binary asset.
    pub fn check(&self, release: &ReleaseInfo) -> Availability {
        let matched_asset = release
            .assets
            .iter()
            .find(|asset| {
                tracing::trace!("Checking asset: {}", asset);
                self.suffixes.iter().any(|s| asset.ends_with(s.as_str()))
            })
            .cloned();

        Availability {
            available: matched_asset.is_some(),
            matched_asset,
            asset_names: release.assets.clone(),
        }
    }
}

impl Default for AssetMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY_SUFFIXES.iter().copied())
    }
}
