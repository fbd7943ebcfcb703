use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use url::Url;

use crate::auth::Token;
use crate::error::{Result, SuiteLensError};
use crate::repo::RepoId;

use super::types::{GitHubErrorBody, GitHubRepository};

/// GitHub REST API client used to resolve repositories before cloning.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `token` - GitHub personal access token
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL is invalid.
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .user_agent(concat!("suitelens/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| SuiteLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut api_url = Url::parse(base_url)
            .map_err(|e| SuiteLensError::Config(format!("Invalid base URL: {e}")))?;

        // Url::join replaces the last segment unless the base ends with '/'
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Helper to build authenticated requests
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    fn repository_url(&self, repo: &RepoId) -> Result<Url> {
        self.api_url
            .join(&format!("repos/{}/{}", repo.owner(), repo.name()))
            .map_err(|e| SuiteLensError::Config(format!("Invalid repository URL: {e}")))
    }

    /// Resolve a repository to its clone metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteLensError::LookupFailure`] when the request cannot be sent,
    /// the API answers with a non-success status, or the body cannot be parsed.
    pub async fn get_repository(&self, repo: &RepoId) -> Result<GitHubRepository> {
        let url = self.repository_url(repo)?;
        debug!("GET {url}");

        let lookup_failure = |reason: String| SuiteLensError::LookupFailure {
            repo: repo.to_string(),
            reason,
        };

        let response = self
            .auth_request(self.client.get(url))
            .send()
            .await
            .map_err(|e| lookup_failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GitHubErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(lookup_failure(format!(
                "GitHub API returned {}: {message}",
                status.as_u16()
            )));
        }

        response
            .json::<GitHubRepository>()
            .await
            .map_err(|e| lookup_failure(format!("Failed to parse repository response: {e}")))
    }
}
