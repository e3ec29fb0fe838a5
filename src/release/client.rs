//! GitHub releases API client.
//!
//! The access token is part of [`ClientConfig`] and is never looked up from
//! the environment here.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use std::time::Duration;

use super::{ReleaseInfo, ReleasePayload, ReleaseResolver};
use crate::error::{ReltrackError, Result};
use crate::manifest::RepoId;

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User-Agent header (required by the GitHub API).
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("reltrack/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Queries the latest release of GitHub repositories.
pub struct GitHubClient {
    client: Client,
    config: ClientConfig,
}

impl GitHubClient {
    /// Create a client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// The API root this client talks to.
    pub fn api_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    /// Whether requests carry an access token.
    pub fn is_authenticated(&self) -> bool {
        self.config.token.is_some()
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");

        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Verify that the API is reachable before processing anything.
    pub fn check_access(&self) -> Result<()> {
        let url = format!("{}/", self.api_url());
        let connectivity = |message: String| ReltrackError::Connectivity {
            url: url.clone(),
            message,
        };

        let response = self
            .get(&url)
            .send()
            .map_err(|e| connectivity(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                tracing::debug!("API reachable at {}", url);
                Ok(())
            }
            StatusCode::FORBIDDEN => Err(connectivity(format!(
                "Unable to access the API. Status code: {}",
                StatusCode::FORBIDDEN.as_u16()
            ))),
            status => Err(connectivity(format!(
                "Unexpected status code: {}",
                status.as_u16()
            ))),
        }
    }

    fn latest_release_url(&self, repo: &RepoId) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url(),
            repo.owner(),
            repo.name()
        )
    }
}

impl ReleaseResolver for GitHubClient {
    fn resolve(&self, repo: &RepoId) -> Result<ReleaseInfo> {
        let url = self.latest_release_url(repo);
        tracing::debug!("Fetching {}", url);

        let response = self
            .get(&url)
            .send()
            .map_err(|e| ReltrackError::transient(repo.to_string(), e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("No published release for {}", repo);
            return Ok(ReleaseInfo::none());
        }
        if !status.is_success() {
            return Err(ReltrackError::transient(
                repo.to_string(),
                format!("HTTP {}", status),
            ));
        }

        let body = response
            .text()
            .map_err(|e| ReltrackError::transient(repo.to_string(), e.to_string()))?;

        let payload: ReleasePayload = serde_json::from_str(&body)
            .map_err(|e| ReltrackError::malformed(repo.to_string(), e.to_string()))?;

        Ok(payload.into())
    }
}
