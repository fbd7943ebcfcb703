//! Stage orchestration: acquire, run, aggregate, render.
//!
//! Acquisition and rendering errors abort the run. Test-run and per-file
//! aggregation problems are reported and the pipeline carries on.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::acquire::{acquire_all, Acquirer};
use crate::aggregate::{load_all, LoadedResults};
use crate::config::{OutputConfig, WorkspaceConfig};
use crate::error::Result;
use crate::output::{write_report, AcquireProgress};
use crate::repo::RepoId;
use crate::runner::{RunOutcome, TestRunner};

/// Directories the pipeline works in, created up front.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub repos_dir: PathBuf,
    /// Absolute, because the test tool runs from inside each checkout.
    pub tests_dir: PathBuf,
    pub report: PathBuf,
}

impl Workspace {
    /// Creates the clone and results directories.
    ///
    /// # Errors
    ///
    /// Fails if either directory cannot be created or the current
    /// directory cannot be resolved.
    pub fn provision(config: &WorkspaceConfig) -> Result<Self> {
        fs::create_dir_all(&config.repos_dir)?;
        fs::create_dir_all(&config.tests_dir)?;

        Ok(Self {
            repos_dir: config.repos_dir.clone(),
            tests_dir: absolute(&config.tests_dir)?,
            report: config.report.clone(),
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// What a completed pipeline run produced.
#[derive(Debug)]
pub struct PipelineReport {
    /// One entry per requested repository, in input order.
    pub outcomes: Vec<RunOutcome>,
    pub results: LoadedResults,
    pub report: PathBuf,
}

pub struct Pipeline<A: Acquirer> {
    acquirer: A,
    runner: TestRunner,
    workspace: Workspace,
    output: OutputConfig,
}

impl<A: Acquirer> Pipeline<A> {
    pub fn new(acquirer: A, runner: TestRunner, workspace: Workspace, output: OutputConfig) -> Self {
        Self {
            acquirer,
            runner,
            workspace,
            output,
        }
    }

    /// Runs every stage for `repos`.
    ///
    /// # Errors
    ///
    /// Returns an error if any repository fails to be acquired, if the
    /// results directory cannot be listed, or if the report cannot be
    /// written. No report is produced when acquisition fails.
    pub async fn run(&self, repos: &[RepoId]) -> Result<PipelineReport> {
        let progress = AcquireProgress::start(repos.len());
        match acquire_all(&self.acquirer, repos, &progress).await {
            Ok(acquired) => progress.finish(acquired.len()),
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        }

        info!("Running suites for {} repositories", repos.len());
        let outcomes = self.runner.run_all(repos).await;

        let results = load_all(&self.workspace.tests_dir)?;

        write_report(
            &results.suites,
            self.output.format,
            self.output.pretty,
            &self.workspace.report,
        )?;
        info!("Report written to {}", self.workspace.report.display());

        Ok(PipelineReport {
            outcomes,
            results,
            report: self.workspace.report.clone(),
        })
    }
}
