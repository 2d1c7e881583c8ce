//! Build a [`Report`] from a set of candidate repositories
//!
//! Each repository is scanned on its own into a [`Project`] sub-tree. Up to
//! `concurrency` repositories run at once; results are merged into the
//! report in discovery order regardless of which finishes first. A failure
//! stops that repository only.

pub mod discover;

use crate::error::Error;
use crate::git::{parse_log, AuthorFilter, GitSource};
use crate::model::{Project, Report};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

pub use discover::{discover_repositories, Candidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// History window passed to `git log --since`
    pub since_days: u32,
    /// Repositories scanned in parallel
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            since_days: 7,
            concurrency: 4,
        }
    }
}

/// Outcome of scanning one repository
#[derive(Debug)]
pub struct RepoScan {
    /// Branches processed before any failure
    pub project: Project,
    /// First error hit, if any
    pub failure: Option<Error>,
}

/// Collect matching commits from every branch of one repository.
///
/// Stops at the first branch whose log cannot be read or parsed; branches
/// already processed stay in the project.
pub async fn scan_repository(
    git: &dyn GitSource,
    candidate: &Candidate,
    filter: &AuthorFilter,
    since_days: u32,
) -> RepoScan {
    let mut project = Project::new(&candidate.name, candidate.path.display().to_string());

    let branches = match git.branches(&candidate.path).await {
        Ok(branches) => branches,
        Err(e) => {
            return RepoScan {
                project,
                failure: Some(e),
            }
        }
    };
    debug!("{}: {} branches", candidate.name, branches.len());

    for branch in branches {
        let commits = match git
            .log(&candidate.path, &branch, since_days)
            .await
            .and_then(|text| parse_log(&text, filter))
        {
            Ok(commits) => commits,
            Err(e) => {
                return RepoScan {
                    project,
                    failure: Some(e),
                }
            }
        };

        let node = project.add_branch(branch);
        for commit in commits {
            node.add_commit(commit);
        }
    }

    RepoScan {
        project,
        failure: None,
    }
}

/// Scan all candidates and merge the results into one report
pub async fn scan_all(
    git: &dyn GitSource,
    candidates: &[Candidate],
    filter: &AuthorFilter,
    options: ScanOptions,
    progress: &ProgressBar,
) -> Report {
    info!(
        "Scanning {} repositories ({} at a time)",
        candidates.len(),
        options.concurrency
    );

    let scans: Vec<RepoScan> = stream::iter(candidates)
        .map(|candidate| async move {
            progress.set_message(candidate.name.clone());
            let scan = scan_repository(git, candidate, filter, options.since_days).await;
            progress.inc(1);
            scan
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let mut report = Report::new();
    for scan in scans {
        let name = scan.project.name.clone();
        report.push_project(scan.project);
        if let Some(err) = scan.failure {
            warn!("{} failed: {}", name, err);
            report.record_failure(name, &err);
        }
    }

    info!(
        "Scan complete: {} projects, {} commits, {} failed",
        report.projects.len(),
        report.commit_count(),
        report.failed.len()
    );
    report
}
