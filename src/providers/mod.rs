mod github;

pub use github::{GitHubAcquirer, GitHubClient};
