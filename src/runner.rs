use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{info, warn};
use tokio::process::Command;

use crate::config::GinkgoConfig;
use crate::output::{bright, error_line, skip_line};
use crate::repo::RepoId;

/// What happened when a repository's suite was (or wasn't) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// The repository has no suite directory.
    Skipped,
    /// The test command ran to completion. `exit_code` is `None` when it
    /// was killed by a signal. `report` is where the JSON report should be,
    /// which may not exist if the tool crashed early.
    Completed {
        exit_code: Option<i32>,
        report: PathBuf,
    },
    /// The test command could not be started.
    LaunchFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub repo: RepoId,
    pub result: RunResult,
}

/// Runs each repository's Ginkgo suite, one at a time.
pub struct TestRunner {
    config: GinkgoConfig,
    repos_dir: PathBuf,
    /// Absolute, since the tool runs with the suite directory as cwd.
    tests_dir: PathBuf,
}

impl TestRunner {
    pub fn new(config: GinkgoConfig, repos_dir: PathBuf, tests_dir: PathBuf) -> Self {
        Self {
            config,
            repos_dir,
            tests_dir,
        }
    }

    fn suite_dir(&self, repo: &RepoId) -> PathBuf {
        self.repos_dir
            .join(repo.dir_name())
            .join(&self.config.suite_dir)
    }

    fn report_name(repo: &RepoId) -> String {
        format!("{}.json", repo.dir_name())
    }

    /// Arguments passed after the configured command.
    pub fn ginkgo_args(&self, repo: &RepoId) -> Vec<String> {
        vec![
            format!("--tags={}", self.config.tags.join(",")),
            format!("--flake-attempts={}", self.config.flake_attempts),
            format!("--procs={}", self.config.procs),
            "-vv".to_string(),
            "--trace".to_string(),
            format!("--output-dir={}", self.tests_dir.display()),
            format!("--json-report={}", Self::report_name(repo)),
            ".".to_string(),
        ]
    }

    /// Runs every repository's suite sequentially, in the given order.
    ///
    /// Missing suites and failing runs are reported on the console and
    /// never stop the remaining repositories.
    pub async fn run_all(&self, repos: &[RepoId]) -> Vec<RunOutcome> {
        let mut outcomes = Vec::with_capacity(repos.len());
        for repo in repos {
            let result = self.run_one(repo).await;
            outcomes.push(RunOutcome {
                repo: repo.clone(),
                result,
            });
        }
        outcomes
    }

    async fn run_one(&self, repo: &RepoId) -> RunResult {
        let dir = self.suite_dir(repo);
        if !dir.is_dir() {
            info!("No suite directory at {}", dir.display());
            skip_line(&format!(
                "No {} directory for {repo}",
                self.config.suite_dir.display()
            ));
            return RunResult::Skipped;
        }

        println!("{}", bright(format!("Running tests for {repo}...")));

        let result = self.invoke(repo, &dir).await;
        match &result {
            RunResult::Completed {
                exit_code: Some(0), ..
            } => info!("Suite for {repo} passed"),
            RunResult::Completed { exit_code, .. } => {
                let reason = exit_code.map_or_else(
                    || "terminated by signal".to_string(),
                    |code| format!("exit status {code}"),
                );
                warn!("Suite for {repo} failed: {reason}");
                error_line(&format!("Ginkgo test failed for {repo}: {reason}"));
            }
            RunResult::LaunchFailed { reason } => {
                warn!("Could not start suite for {repo}: {reason}");
                error_line(&format!("Ginkgo test failed for {repo}: {reason}"));
            }
            RunResult::Skipped => {}
        }
        result
    }

    async fn invoke(&self, repo: &RepoId, dir: &Path) -> RunResult {
        let Some((program, leading_args)) = self.config.command.split_first() else {
            return RunResult::LaunchFailed {
                reason: "empty test command".to_string(),
            };
        };

        let status = Command::new(program)
            .args(leading_args)
            .args(self.ginkgo_args(repo))
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        match status {
            Ok(status) => RunResult::Completed {
                exit_code: status.code(),
                report: self.tests_dir.join(Self::report_name(repo)),
            },
            Err(e) => RunResult::LaunchFailed {
                reason: format!("failed to run {program}: {e}"),
            },
        }
    }
}
