use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SuiteLensError};

/// A GitHub repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory and report stem for this repository (`owner_name`).
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = SuiteLensError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split('/').collect();

        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(SuiteLensError::InvalidIdentifier(trimmed.to_string())),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parses a newline-delimited repository list, ignoring blank lines.
///
/// The first malformed entry aborts parsing.
pub fn parse_repo_list(input: &str) -> Result<Vec<RepoId>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::parse)
        .collect()
}
