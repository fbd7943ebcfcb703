use std::path::PathBuf;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, info};

use crate::error::Result;
use crate::output::AcquireProgress;
use crate::repo::RepoId;

/// Produces a local working copy for a repository.
#[allow(async_fn_in_trait)]
pub trait Acquirer {
    /// Fetches `repo` and returns the directory holding its working copy.
    ///
    /// Console lines go through `progress` so they do not tear the spinner.
    async fn acquire(&self, repo: &RepoId, progress: &AcquireProgress) -> Result<PathBuf>;
}

/// A successfully acquired repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub repo: RepoId,
    pub path: PathBuf,
}

/// Acquires every repository concurrently, failing fast.
///
/// All acquisitions start at once with no concurrency cap. Outcomes are
/// observed in completion order and the first error is returned immediately;
/// the remaining futures are dropped without any cleanup of what they have
/// already written to disk. On success the result is in completion order.
///
/// # Errors
///
/// Returns the first error reported by any acquisition.
pub async fn acquire_all<A: Acquirer>(
    acquirer: &A,
    repos: &[RepoId],
    progress: &AcquireProgress,
) -> Result<Vec<Acquired>> {
    info!("Acquiring {} repositories in parallel...", repos.len());

    let mut pending: FuturesUnordered<_> = repos
        .iter()
        .map(|repo| async move {
            acquirer.acquire(repo, progress).await.map(|path| Acquired {
                repo: repo.clone(),
                path,
            })
        })
        .collect();

    let mut acquired = Vec::with_capacity(repos.len());
    while let Some(outcome) = pending.next().await {
        match outcome {
            Ok(done) => {
                debug!("Acquired {} at {}", done.repo, done.path.display());
                acquired.push(done);
            }
            Err(e) => {
                error!("Aborting acquisition: {e}");
                return Err(e);
            }
        }
    }

    info!("Acquired {} repositories", acquired.len());
    Ok(acquired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuiteLensError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Fake acquirer: repos named `bad` fail, repos named `slow` never finish
    /// in test time, everything else rendezvous on a barrier first.
    struct FakeAcquirer {
        barrier: Option<Barrier>,
        started: AtomicUsize,
    }

    impl FakeAcquirer {
        fn new(barrier: Option<Barrier>) -> Self {
            Self {
                barrier,
                started: AtomicUsize::new(0),
            }
        }
    }

    impl Acquirer for FakeAcquirer {
        async fn acquire(&self, repo: &RepoId, _progress: &AcquireProgress) -> Result<PathBuf> {
            self.started.fetch_add(1, Ordering::SeqCst);
            match repo.name() {
                "bad" => {
                    tokio::task::yield_now().await;
                    Err(SuiteLensError::FetchFailure {
                        repo: repo.to_string(),
                        reason: "boom".to_string(),
                    })
                }
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(PathBuf::from("never"))
                }
                _ => {
                    if let Some(barrier) = &self.barrier {
                        barrier.wait().await;
                    }
                    Ok(PathBuf::from("repos").join(repo.dir_name()))
                }
            }
        }
    }

    fn repos(raw: &[&str]) -> Vec<RepoId> {
        raw.iter().map(|r| r.parse().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_acquire_all_runs_concurrently() {
        // Three acquisitions wait on a three-party barrier; sequential
        // execution would never get past the first one.
        let acquirer = FakeAcquirer::new(Some(Barrier::new(3)));
        let repos = repos(&["acme/a", "acme/b", "acme/c"]);

        let acquired = tokio::time::timeout(
            Duration::from_secs(5),
            acquire_all(&acquirer, &repos, &AcquireProgress::hidden()),
        )
        .await
        .expect("acquisitions should not be serialized")
        .unwrap();

        assert_eq!(acquired.len(), 3);
        let mut names: Vec<_> = acquired.iter().map(|a| a.repo.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["acme/a", "acme/b", "acme/c"]);
        assert!(acquired
            .iter()
            .all(|a| a.path == PathBuf::from("repos").join(a.repo.dir_name())));
    }

    #[tokio::test]
    async fn test_acquire_all_fails_fast_on_first_error() {
        let acquirer = FakeAcquirer::new(None);
        let repos = repos(&["acme/slow", "acme/bad", "acme/ok"]);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            acquire_all(&acquirer, &repos, &AcquireProgress::hidden()),
        )
        .await
        .expect("should not wait for the slow acquisition");

        assert!(matches!(result, Err(SuiteLensError::FetchFailure { .. })));
        assert_eq!(acquirer.started.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_acquire_all_empty_input() {
        let acquirer = FakeAcquirer::new(None);
        let acquired = acquire_all(&acquirer, &[], &AcquireProgress::hidden())
            .await
            .unwrap();
        assert!(acquired.is_empty());
    }
}
