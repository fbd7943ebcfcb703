use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for suitelens.
///
/// Lets operators pin workspace layout and Ginkgo settings instead of
/// repeating flags. Command-line flags override anything set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub ginkgo: GinkgoConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub personal access token
    pub token: Option<String>,

    /// GitHub API base URL
    #[serde(default = "default_github_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceConfig {
    /// Where repositories are cloned
    #[serde(default = "default_repos_dir")]
    pub repos_dir: PathBuf,

    /// Where Ginkgo writes its JSON reports
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,

    /// Combined report path
    #[serde(default = "default_report")]
    pub report: PathBuf,

    /// Reuse existing clones instead of cloning again
    #[serde(default)]
    pub reuse_clones: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GinkgoConfig {
    /// Program and leading arguments used to invoke Ginkgo
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Suite directory relative to the repository root
    #[serde(default = "default_suite_dir")]
    pub suite_dir: PathBuf,

    /// Build tags passed via `--tags`
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// Per-spec retry budget passed via `--flake-attempts`
    #[serde(default = "default_flake_attempts")]
    pub flake_attempts: u32,

    /// Parallel worker count passed via `--procs`
    #[serde(default = "default_procs")]
    pub procs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: ReportFormat,

    /// Pretty-print JSON reports
    #[serde(default)]
    pub pretty: bool,

    /// Print the terminal summary table
    #[serde(default = "default_true")]
    pub summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_github_base_url(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            repos_dir: default_repos_dir(),
            tests_dir: default_tests_dir(),
            report: default_report(),
            reuse_clones: false,
        }
    }
}

impl Default for GinkgoConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            suite_dir: default_suite_dir(),
            tags: default_tags(),
            flake_attempts: default_flake_attempts(),
            procs: default_procs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            pretty: false,
            summary: true,
        }
    }
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_repos_dir() -> PathBuf {
    PathBuf::from("repos")
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from("tests")
}

fn default_report() -> PathBuf {
    PathBuf::from("report.txt")
}

fn default_command() -> Vec<String> {
    vec!["ginkgo".to_string()]
}

fn default_suite_dir() -> PathBuf {
    PathBuf::from("test/e2e")
}

fn default_tags() -> Vec<String> {
    vec!["e2e".to_string(), "osde2e".to_string()]
}

fn default_flake_attempts() -> u32 {
    3
}

fn default_procs() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

const CANDIDATES: [&str; 4] = [
    "suitelens.toml",
    "suitelens.json",
    "suitelens.yaml",
    "suitelens.yml",
];

impl Config {
    /// Load configuration from a file.
    ///
    /// Uses `path` when given, otherwise the first of
    /// `suitelens.{toml,json,yaml,yml}` found in the current directory.
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::discover(&std::env::current_dir()?),
        }
    }

    /// Load the first candidate config file found in `dir`.
    fn discover(dir: &Path) -> Result<Self> {
        CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.exists())
            .map_or_else(|| Ok(Self::default()), |path| Self::load_from_path(&path))
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}
