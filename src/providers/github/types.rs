use serde::{Deserialize, Serialize};

/// Subset of the GitHub repository resource needed to clone it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    /// Full repository name in "owner/name" format
    pub full_name: String,
    /// HTTPS clone URL
    pub clone_url: String,
    /// Default branch name (e.g., "main")
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Error body returned by the GitHub API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(super) struct GitHubErrorBody {
    pub message: String,
}
