//! GitHub API client for listing a user's public repositories.
//!
//! This module provides:
//!
//! - `GitHubClient`: HTTP client wrapper implementing `RepoSource`
//! - `RepoError`: the typed failure rendered in the empty-state slot
//! - `repos_url`: builds the listing URL from a `RepoRequest`
//!
//! The response body is returned as raw JSON so the loader can apply its own
//! lenient decoding. Non-success statuses are not interpreted beyond their code.

use reqwest::Url;
use thiserror::Error;

use crate::repos::{RepoRequest, RepoSource};

/// GitHub API base URL
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Media type requested from the API
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// User agent for API requests
const USER_AGENT: &str = concat!("Folio/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while loading repositories
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("GitHub API error: {0}")]
    Status(u16),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Build `{base}/users/{account}/repos?sort=..&per_page=..`.
///
/// The account is percent-encoded as a single path segment.
pub fn repos_url(base: &str, request: &RepoRequest) -> Result<Url, RepoError> {
    let mut url = Url::parse(base).map_err(|e| RepoError::InvalidUrl(e.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| RepoError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["users", request.account.as_str(), "repos"]);

    url.query_pairs_mut()
        .append_pair("sort", &request.sort)
        .append_pair("per_page", &request.per_page.to_string());

    Ok(url)
}

/// GitHub API client
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a new GitHub API client
    pub fn new() -> Result<Self, RepoError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: GITHUB_API_BASE.to_string(),
        })
    }

    /// Fetch the repository listing for `request.account`
    pub async fn list_user_repos(
        &self,
        request: &RepoRequest,
    ) -> Result<serde_json::Value, RepoError> {
        let start = std::time::Instant::now();
        let url = repos_url(&self.base_url, request)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("GitHub API returned {} for {}", status, request.account);
            return Err(RepoError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        tracing::info!(
            "Fetched repositories for {} in {:.1}s",
            request.account,
            start.elapsed().as_secs_f32()
        );

        Ok(body)
    }
}

impl RepoSource for GitHubClient {
    async fn list_repos(&self, request: &RepoRequest) -> Result<serde_json::Value, RepoError> {
        self.list_user_repos(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(account: &str) -> RepoRequest {
        RepoRequest {
            account: account.to_string(),
            sort: "updated".to_string(),
            per_page: 5,
            include_forks: false,
        }
    }

    #[test]
    fn test_repos_url() {
        let url = repos_url(GITHUB_API_BASE, &request("Kemoshu")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/Kemoshu/repos?sort=updated&per_page=5"
        );
    }

    #[test]
    fn test_repos_url_encodes_account() {
        let url = repos_url(GITHUB_API_BASE, &request("a b/c")).unwrap();
        assert_eq!(url.path(), "/users/a%20b%2Fc/repos");
    }

    #[test]
    fn test_repos_url_keeps_base_path() {
        let url = repos_url("http://localhost:8080/api/", &request("octocat")).unwrap();
        assert_eq!(url.path(), "/api/users/octocat/repos");
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(RepoError::Status(404).to_string(), "GitHub API error: 404");
    }

    #[test]
    fn test_invalid_base() {
        let err = repos_url("not a url", &request("octocat")).unwrap_err();
        assert!(matches!(err, RepoError::InvalidUrl(_)));
    }
}
