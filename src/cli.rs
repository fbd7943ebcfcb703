use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::Read;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::{Config, ReportFormat};
use crate::error::SuiteLensError;
use crate::output::{bright_green, print_summary};
use crate::pipeline::{Pipeline, Workspace};
use crate::providers::{GitHubAcquirer, GitHubClient};
use crate::repo::parse_repo_list;
use crate::runner::TestRunner;

/// Reads `owner/name` repository identifiers from stdin, one per line.
#[derive(Parser)]
#[command(name = "suitelens")]
#[command(author, version, about = "Run Ginkgo E2E suites across GitHub repositories and aggregate the results", long_about = None)]
pub struct Cli {
    /// GitHub token used to look up repositories
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Config file (defaults to ./suitelens.{toml,json,yaml,yml} when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Directory repositories are cloned into
    #[arg(long)]
    repos_dir: Option<PathBuf>,

    /// Directory Ginkgo JSON reports are written to
    #[arg(long)]
    tests_dir: Option<PathBuf>,

    /// Combined report path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Combined report format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Pretty-print JSON reports
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Reuse existing clones under the repos directory
    #[arg(long, default_value_t = false)]
    reuse_clones: bool,

    /// Ginkgo --flake-attempts value
    #[arg(long)]
    flake_attempts: Option<u32>,

    /// Ginkgo --procs value
    #[arg(long)]
    procs: Option<u32>,

    /// Skip the terminal summary table
    #[arg(long, default_value_t = false)]
    no_summary: bool,
}

impl Cli {
    /// Layers command-line values over the loaded config.
    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(token) = &self.token {
            config.github.token = Some(token.clone());
        }
        if let Some(api_url) = &self.api_url {
            config.github.base_url.clone_from(api_url);
        }
        if let Some(repos_dir) = &self.repos_dir {
            config.workspace.repos_dir.clone_from(repos_dir);
        }
        if let Some(tests_dir) = &self.tests_dir {
            config.workspace.tests_dir.clone_from(tests_dir);
        }
        if let Some(output) = &self.output {
            config.workspace.report.clone_from(output);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(flake_attempts) = self.flake_attempts {
            config.ginkgo.flake_attempts = flake_attempts;
        }
        if let Some(procs) = self.procs {
            config.ginkgo.procs = procs;
        }
        config.output.pretty |= self.pretty;
        config.workspace.reuse_clones |= self.reuse_clones;
        if self.no_summary {
            config.output.summary = false;
        }
        config
    }

    pub async fn execute(&self) -> Result<()> {
        self.run(std::io::stdin()).await
    }

    /// Runs the whole tool with the repository list read from `input`.
    async fn run(&self, mut input: impl Read) -> Result<()> {
        let config = self.apply_overrides(Config::load(self.config.as_deref())?);
        let token = require_token(config.github.token.as_deref())?;

        let workspace = Workspace::provision(&config.workspace)
            .context("Failed to create working directories")?;

        let mut list = String::new();
        input
            .read_to_string(&mut list)
            .context("Failed to read repository list from stdin")?;
        let repos = parse_repo_list(&list)?;
        info!("Read {} repositories from stdin", repos.len());

        let client = GitHubClient::new(&config.github.base_url, Some(token))?;
        let acquirer = GitHubAcquirer::new(
            client,
            workspace.repos_dir.clone(),
            config.workspace.reuse_clones,
        );
        let runner = TestRunner::new(
            config.ginkgo.clone(),
            workspace.repos_dir.clone(),
            workspace.tests_dir.clone(),
        );

        let pipeline = Pipeline::new(acquirer, runner, workspace, config.output.clone());
        let report = pipeline.run(&repos).await?;

        if config.output.summary {
            print_summary(&report.outcomes, &report.results);
        }

        println!(
            "{} See {} for results.",
            bright_green("All done!"),
            report.report.display()
        );

        Ok(())
    }
}

fn require_token(token: Option<&str>) -> std::result::Result<Token, SuiteLensError> {
    match token {
        Some(token) if !token.is_empty() => Ok(Token::from(token)),
        _ => Err(SuiteLensError::MissingCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_token() {
        assert!(matches!(
            require_token(None),
            Err(SuiteLensError::MissingCredential)
        ));
        assert!(matches!(
            require_token(Some("")),
            Err(SuiteLensError::MissingCredential)
        ));
        assert_eq!(require_token(Some("ghp")).unwrap().as_str(), "ghp");
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "suitelens",
            "--token",
            "ghp-flag",
            "--output",
            "out/report.json",
            "--format",
            "json",
            "--procs",
            "2",
            "--no-summary",
            "--reuse-clones",
        ])
        .unwrap();

        let config = cli.apply_overrides(Config::default());

        assert_eq!(config.github.token.as_deref(), Some("ghp-flag"));
        assert_eq!(config.workspace.report, PathBuf::from("out/report.json"));
        assert_eq!(config.output.format, ReportFormat::Json);
        assert_eq!(config.ginkgo.procs, 2);
        assert_eq!(config.ginkgo.flake_attempts, 3);
        assert!(!config.output.summary);
        assert!(config.workspace.reuse_clones);
    }

    #[tokio::test]
    async fn test_invalid_identifier_fails_run_without_report() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = temp_dir.path();
        let config_path = root.join("suitelens.toml");
        std::fs::write(&config_path, "").unwrap();
        let path_arg = |name: &str| root.join(name).display().to_string();

        let cli = Cli::try_parse_from([
            "suitelens".to_string(),
            "--token".to_string(),
            "t".to_string(),
            "--config".to_string(),
            config_path.display().to_string(),
            "--api-url".to_string(),
            "http://127.0.0.1:9".to_string(),
            "--repos-dir".to_string(),
            path_arg("repos"),
            "--tests-dir".to_string(),
            path_arg("tests"),
            "--output".to_string(),
            path_arg("report.txt"),
        ])
        .unwrap();

        let err = cli
            .run("acme/widgets\nnot-a-repo\n".as_bytes())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SuiteLensError>(),
            Some(SuiteLensError::InvalidIdentifier(raw)) if raw == "not-a-repo"
        ));
        assert!(!root.join("report.txt").exists());
        assert_eq!(std::fs::read_dir(root.join("repos")).unwrap().count(), 0);
    }

    #[test]
    fn test_unset_flags_keep_config_values() {
        let cli = Cli::try_parse_from(["suitelens", "--token", "t"]).unwrap();
        let mut file_config = Config::default();
        file_config.ginkgo.flake_attempts = 7;
        file_config.workspace.tests_dir = PathBuf::from("/results");

        let config = cli.apply_overrides(file_config);

        assert_eq!(config.ginkgo.flake_attempts, 7);
        assert_eq!(config.workspace.tests_dir, PathBuf::from("/results"));
        assert!(config.output.summary);
    }
}
