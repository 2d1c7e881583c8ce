//! Aggregated commit history across repositories
//!
//! The tree is append-only: `Report` → `Project` → `Branch` → `Commit`, plus a
//! map of repositories that could not be processed. Each `add_*` method
//! returns the node it created so callers can keep appending under it.

use crate::error::Error;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of one run's results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Repository name -> error message, sorted by repository name
    #[serde(default)]
    pub failed: BTreeMap<String, String>,
    /// Projects in directory-scan order
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// One scanned repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Directory name
    pub name: String,
    /// Absolute path of the checkout
    pub path: String,
    /// Branches in listing order
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// A branch and the matching commits from its log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Commits in log order (newest first)
    #[serde(default)]
    pub commits: Vec<Commit>,
}

/// A single commit as reported by `git log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Subject line of the commit message
    pub name: String,
    /// Raw author string, e.g. `Alice Smith <alice@example.com>`
    pub author: String,
    /// Author date with its original UTC offset
    pub date: DateTime<FixedOffset>,
    /// Commit hash
    pub hash: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, empty project and return it
    pub fn add_project(&mut self, name: impl Into<String>, path: impl Into<String>) -> &mut Project {
        self.push_project(Project::new(name, path))
    }

    /// Append a project built elsewhere (e.g. by a scan worker)
    pub fn push_project(&mut self, project: Project) -> &mut Project {
        self.projects.push(project);
        let last = self.projects.len() - 1;
        &mut self.projects[last]
    }

    /// Record why a repository failed. The first failure for a name wins.
    pub fn record_failure(&mut self, repo: impl Into<String>, error: &Error) {
        self.failed
            .entry(repo.into())
            .or_insert_with(|| error.to_string());
    }

    /// Check whether a repository has a recorded failure
    pub fn has_failed(&self, repo: &str) -> bool {
        self.failed.contains_key(repo)
    }

    /// Total commits across all projects
    pub fn commit_count(&self) -> usize {
        self.projects.iter().map(Project::commit_count).sum()
    }
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            branches: Vec::new(),
        }
    }

    /// Append a new, empty branch and return it
    pub fn add_branch(&mut self, name: impl Into<String>) -> &mut Branch {
        self.branches.push(Branch::new(name));
        let last = self.branches.len() - 1;
        &mut self.branches[last]
    }

    pub fn commit_count(&self) -> usize {
        self.branches.iter().map(|b| b.commits.len()).sum()
    }
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commits: Vec::new(),
        }
    }

    /// Append a commit and return a reference to it
    pub fn add_commit(&mut self, commit: Commit) -> &Commit {
        self.commits.push(commit);
        let last = self.commits.len() - 1;
        &self.commits[last]
    }
}

impl Commit {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        date: DateTime<FixedOffset>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            date,
            hash: hash.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitError;

    fn date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn listing_error(repo: &str, source: &str) -> Error {
        Error::Git(GitError::BranchListing {
            repo: repo.to_string(),
            source: source.to_string(),
        })
    }

    #[test]
    fn test_append_returns_handles() {
        let mut report = Report::new();
        let project = report.add_project("api", "/src/api");
        let branch = project.add_branch("main");
        let commit = branch.add_commit(Commit::new(
            "Add health check",
            "Alice <alice@example.com>",
            date("2024-01-03T10:00:00Z"),
            "a1b2c3",
        ));
        assert_eq!(commit.hash, "a1b2c3");

        project.add_branch("dev");

        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.projects[0].branches.len(), 2);
        assert_eq!(report.projects[0].branches[0].commits.len(), 1);
        assert_eq!(report.commit_count(), 1);
    }

    #[test]
    fn test_duplicate_branch_names_are_kept() {
        let mut project = Project::new("web", "/src/web");
        project.add_branch("main");
        project.add_branch("main");
        let names: Vec<_> = project.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["main", "main"]);
    }

    #[test]
    fn test_first_failure_wins() {
        let mut report = Report::new();
        report.record_failure("web", &listing_error("web", "first"));
        report.record_failure("web", &listing_error("web", "second"));

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed["web"].contains("first"));
        assert!(report.has_failed("web"));
        assert!(!report.has_failed("api"));
    }

    #[test]
    fn test_empty_project_is_kept() {
        let mut report = Report::new();
        report.add_project("empty", "/src/empty");
        assert_eq!(report.projects.len(), 1);
        assert!(report.projects[0].branches.is_empty());
        assert_eq!(report.commit_count(), 0);
    }
}
