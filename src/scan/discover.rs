//! Find candidate repositories under a root directory.
//!
//! Only direct children of the root are considered, in file-name order, and
//! only those modified within the scan window.

use crate::error::{Error, IoError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};
use walkdir::WalkDir;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// A directory that may hold recent commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Directory name, used as the project name
    pub name: String,
    /// Absolute path
    pub path: PathBuf,
}

impl Candidate {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// List repositories under `root` modified within the last `since_days` days
pub fn discover_repositories(
    root: &Path,
    since_days: u32,
    require_git_dir: bool,
) -> Result<Vec<Candidate>> {
    discover_repositories_at(root, since_days, require_git_dir, SystemTime::now())
}

/// Same as [`discover_repositories`] with an explicit "now"
pub fn discover_repositories_at(
    root: &Path,
    since_days: u32,
    require_git_dir: bool,
    now: SystemTime,
) -> Result<Vec<Candidate>> {
    let read_dir_failed = |source: std::io::Error| {
        Error::Io(IoError::ReadDirFailed {
            path: root.display().to_string(),
            source,
        })
    };

    let root = fs::canonicalize(root).map_err(read_dir_failed)?;
    fs::read_dir(&root).map_err(read_dir_failed)?;

    let window = Duration::from_secs(u64::from(since_days) * SECS_PER_DAY);
    let mut candidates = Vec::new();

    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let modified = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(modified) => modified,
            None => {
                warn!("No modification time for {}, skipping", path.display());
                continue;
            }
        };

        // Timestamps in the future count as recent
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age > window {
            debug!("{} not modified in the last {} days", path.display(), since_days);
            continue;
        }

        if require_git_dir && !path.join(".git").exists() {
            debug!("{} is not a git checkout, skipping", path.display());
            continue;
        }

        candidates.push(Candidate::new(
            entry.file_name().to_string_lossy().into_owned(),
            path,
        ));
    }

    Ok(candidates)
}
