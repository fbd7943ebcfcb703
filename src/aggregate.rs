use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::Result;
use crate::output::skip_line;
use crate::suite::Suite;

/// Result files that could not be read or decoded.
#[derive(Debug)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything decoded from a results directory.
#[derive(Debug, Default)]
pub struct LoadedResults {
    /// Concatenation of every decoded file's suites, in file-name order.
    pub suites: Vec<Suite>,
    pub rejected: Vec<RejectedFile>,
}

/// Loads every `*.json` file in `results_dir` as a list of suites.
///
/// Files are visited in file-name order. Directories are ignored; any other
/// entry with a `.json` name is read, so symlinked reports are followed. A
/// file that cannot be read or decoded is reported and skipped; it never
/// hides the other files' results.
///
/// # Errors
///
/// Returns an error only if the directory itself cannot be listed.
pub fn load_all(results_dir: &Path) -> Result<LoadedResults> {
    let mut loaded = LoadedResults::default();
    let mut files = Vec::new();

    for entry in fs::read_dir(results_dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", results_dir.display());
                continue;
            }
        };

        match classify(entry.path(), entry.file_type()) {
            Candidate::Load(path) => files.push(path),
            Candidate::Ignore => {}
            Candidate::Reject(rejected) => reject(&mut loaded, rejected),
        }
    }
    files.sort();

    for path in files {
        match load_file(&path) {
            Ok(suites) => {
                debug!("Loaded {} suites from {}", suites.len(), path.display());
                loaded.suites.extend(suites);
            }
            Err(reason) => reject(&mut loaded, RejectedFile { path, reason }),
        }
    }

    info!(
        "Loaded {} suites from {} ({} files skipped)",
        loaded.suites.len(),
        results_dir.display(),
        loaded.rejected.len()
    );

    Ok(loaded)
}

#[derive(Debug)]
enum Candidate {
    Load(PathBuf),
    Ignore,
    Reject(RejectedFile),
}

/// Decides what to do with one directory entry from its name and type.
fn classify(path: PathBuf, file_type: io::Result<FileType>) -> Candidate {
    let is_json = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".json"));
    if !is_json {
        return Candidate::Ignore;
    }

    match file_type {
        Ok(file_type) if file_type.is_dir() => {
            debug!("Ignoring directory {}", path.display());
            Candidate::Ignore
        }
        Ok(_) => Candidate::Load(path),
        Err(e) => Candidate::Reject(RejectedFile {
            path,
            reason: e.to_string(),
        }),
    }
}

fn reject(loaded: &mut LoadedResults, rejected: RejectedFile) {
    warn!(
        "Skipping result file {}: {}",
        rejected.path.display(),
        rejected.reason
    );
    skip_line(&format!("{}: {}", rejected.path.display(), rejected.reason));
    loaded.rejected.push(rejected);
}

fn load_file(path: &Path) -> std::result::Result<Vec<Suite>, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}
