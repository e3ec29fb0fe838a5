//! Manifest loading.
//!
//! The manifest is either fetched over HTTP(S) or read from a local file.

use anyhow::{anyhow, Context};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::Manifest;

/// Where the manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// A remote plain-text list.
    Url(String),
    /// A local file.
    File(PathBuf),
}

impl ManifestSource {
    /// Interpret a manifest location given on the command line or in config.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Load and parse the manifest.
    pub fn load(&self, timeout: Duration) -> crate::error::Result<Manifest> {
        let text = match self {
            Self::Url(url) => fetch_text(url, timeout)?,
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read manifest {}", path.display()))?,
        };

        let manifest = Manifest::parse(&text);
        tracing::debug!("Loaded {} manifest entries from {}", manifest.len(), self);
        Ok(manifest)
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch_text(url: &str, timeout: Duration) -> anyhow::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("reltrack")
        .timeout(timeout)
        .build()?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP {} fetching {}", response.status(), url));
    }

    response
        .text()
        .with_context(|| format!("Failed to read response from {}", url))
}
