mod client;
mod provider;
mod types;

pub use client::GitHubClient;
pub use provider::GitHubAcquirer;
