use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteLensError {
    #[error("invalid repo format: {0:?} (expected 'owner/name')")]
    InvalidIdentifier(String),

    #[error("failed to look up repository {repo}: {reason}")]
    LookupFailure { repo: String, reason: String },

    #[error("failed to fetch repository {repo}: {reason}")]
    FetchFailure { repo: String, reason: String },

    #[error("GITHUB_TOKEN must be set in the environment")]
    MissingCredential,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to render report {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SuiteLensError>;
