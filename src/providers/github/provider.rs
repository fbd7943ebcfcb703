use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{debug, info};
use tokio::process::Command;

use crate::acquire::Acquirer;
use crate::error::{Result, SuiteLensError};
use crate::output::{dim, AcquireProgress};
use crate::repo::RepoId;

use super::client::GitHubClient;

/// Acquires repositories by resolving them through the GitHub API and
/// shallow-cloning their default branch with `git`.
pub struct GitHubAcquirer {
    /// GitHub API client
    client: GitHubClient,
    /// Root under which `owner_name` clone directories are created
    repos_dir: PathBuf,
    /// Reuse an existing clone instead of cloning again
    reuse_clones: bool,
}

impl GitHubAcquirer {
    pub fn new(client: GitHubClient, repos_dir: PathBuf, reuse_clones: bool) -> Self {
        Self {
            client,
            repos_dir,
            reuse_clones,
        }
    }

    fn fetch_failure(repo: &RepoId, reason: String) -> SuiteLensError {
        SuiteLensError::FetchFailure {
            repo: repo.to_string(),
            reason,
        }
    }

    async fn shallow_clone(&self, repo: &RepoId, clone_url: &str, target: &Path) -> Result<()> {
        debug!("git clone --depth=1 {clone_url} {}", target.display());

        let output = Command::new("git")
            .arg("clone")
            .arg("--depth=1")
            .arg(clone_url)
            .arg(target)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::fetch_failure(repo, format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or_default().trim();
            return Err(Self::fetch_failure(
                repo,
                format!("git clone exited with {}: {detail}", output.status),
            ));
        }

        Ok(())
    }
}

impl Acquirer for GitHubAcquirer {
    async fn acquire(&self, repo: &RepoId, progress: &AcquireProgress) -> Result<PathBuf> {
        let target = self.repos_dir.join(repo.dir_name());

        if self.reuse_clones && target.join(".git").is_dir() {
            info!("Reusing existing clone of {repo} at {}", target.display());
            progress.println(format!("{} {}", dim("Reusing clone:"), repo));
            return Ok(target);
        }

        let repository = self.client.get_repository(repo).await?;
        progress.println(format!("Cloning repository: {}", repository.full_name));

        self.shallow_clone(repo, &repository.clone_url, &target)
            .await?;

        info!(
            "Cloned {repo} ({}) into {}",
            repository.default_branch.as_deref().unwrap_or("default branch"),
            target.display()
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Token;
    use crate::output::captured_progress as captured;
    use tempfile::TempDir;

    fn repo(raw: &str) -> RepoId {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn test_lookup_failure_creates_no_directory() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/missing")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let client = GitHubClient::new(&server.url(), Some(Token::from("t"))).unwrap();
        let acquirer = GitHubAcquirer::new(client, temp_dir.path().to_path_buf(), false);

        let err = acquirer
            .acquire(&repo("acme/missing"), &AcquireProgress::hidden())
            .await
            .unwrap_err();

        assert!(matches!(err, SuiteLensError::LookupFailure { .. }));
        assert!(!temp_dir.path().join("acme_missing").exists());
    }

    #[tokio::test]
    async fn test_unreachable_clone_url_is_fetch_failure() {
        let temp_dir = TempDir::new().unwrap();
        let bogus_remote = temp_dir.path().join("no-such-remote.git");

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/widgets")
            .with_status(200)
            .with_body(format!(
                r#"{{"full_name": "acme/widgets", "clone_url": "{}"}}"#,
                bogus_remote.display()
            ))
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let acquirer = GitHubAcquirer::new(client, temp_dir.path().join("repos"), false);

        let err = acquirer
            .acquire(&repo("acme/widgets"), &AcquireProgress::hidden())
            .await
            .unwrap_err();

        match err {
            SuiteLensError::FetchFailure { repo, .. } => assert_eq!(repo, "acme/widgets"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_reuse_existing_clone_skips_lookup() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widgets")
            .expect(0)
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("acme_widgets").join(".git")).unwrap();

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let acquirer = GitHubAcquirer::new(client, temp_dir.path().to_path_buf(), true);

        let (progress, term) = captured(1);
        let path = acquirer
            .acquire(&repo("acme/widgets"), &progress)
            .await
            .unwrap();

        assert_eq!(path, temp_dir.path().join("acme_widgets"));
        assert!(term.contents().contains("Reusing clone: acme/widgets"));
        mock.assert_async().await;
    }
}
