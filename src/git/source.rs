//! Access to branch names, log text and the configured user
//!
//! Branches and `user.name` are read through libgit2. Log text comes from
//! the `git` executable so the parser sees exactly what `git log` prints.

use crate::error::{Error, GitError, Result};
use async_trait::async_trait;
use git2::{BranchType, Repository};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Source of raw version-control data for one repository at a time
#[async_trait]
pub trait GitSource: Send + Sync {
    /// Local branch names in listing order
    async fn branches(&self, repo: &Path) -> Result<Vec<String>>;

    /// Raw `git log` text for `branch`, limited to the last `since_days` days
    async fn log(&self, repo: &Path, branch: &str, since_days: u32) -> Result<String>;
}

/// Default source backed by libgit2 and the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    timeout: Duration,
}

impl GitCli {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(30)
    }
}

#[async_trait]
impl GitSource for GitCli {
    async fn branches(&self, repo: &Path) -> Result<Vec<String>> {
        let path = repo.to_path_buf();
        let name = display_name(repo);
        let listing = tokio::task::spawn_blocking(move || list_local_branches(&path));

        match tokio::time::timeout(self.timeout, listing).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(GitError::BranchListing {
                repo: name,
                source: join_err.to_string(),
            }
            .into()),
            Err(_) => Err(GitError::Timeout {
                operation: format!("list branches of {}", name),
                secs: self.timeout.as_secs(),
            }
            .into()),
        }
    }

    async fn log(&self, repo: &Path, branch: &str, since_days: u32) -> Result<String> {
        let repo_name = display_name(repo);
        let retrieval_error = |source: String| -> Error {
            GitError::LogRetrieval {
                repo: repo_name.clone(),
                branch: branch.to_string(),
                source,
            }
            .into()
        };

        let mut cmd = Command::new("git");
        cmd.arg("log")
            .arg(format!("--since={} days ago", since_days))
            .args(["--date=default", "--format=medium", "--no-color", "--no-decorate"])
            .arg(branch)
            .arg("--")
            .current_dir(repo)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!("Executing: git log {} in {}", branch, repo.display());

        let child = cmd
            .spawn()
            .map_err(|e| retrieval_error(format!("failed to spawn git: {}", e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| -> Error {
                GitError::Timeout {
                    operation: format!("git log {} in {}", branch, repo_name),
                    secs: self.timeout.as_secs(),
                }
                .into()
            })?
            .map_err(|e| retrieval_error(format!("process error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(retrieval_error(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| retrieval_error(format!("invalid UTF-8 in output: {}", e)))
    }
}

/// Read local branch names, sorted the way `git branch -l` prints them
pub fn list_local_branches(repo_path: &Path) -> Result<Vec<String>> {
    let listing_error = |source: String| -> Error {
        GitError::BranchListing {
            repo: display_name(repo_path),
            source,
        }
        .into()
    };

    let repo = Repository::open(repo_path).map_err(|e| listing_error(e.message().to_string()))?;
    let branches = repo
        .branches(Some(BranchType::Local))
        .map_err(|e| listing_error(e.message().to_string()))?;

    let mut names = Vec::new();
    for entry in branches {
        let (branch, _) = entry.map_err(|e| listing_error(e.message().to_string()))?;
        let name = branch
            .name()
            .map_err(|e| listing_error(e.message().to_string()))?
            .ok_or_else(|| listing_error("branch name is not valid UTF-8".to_string()))?;
        names.push(name.to_string());
    }
    names.sort();

    Ok(names)
}

/// `user.name` from the global/system git configuration
pub fn configured_user_name() -> Result<String> {
    let config = git2::Config::open_default()
        .map_err(|e| GitError::UserNameUnavailable(e.message().to_string()))?;
    let name = config
        .get_string("user.name")
        .map_err(|e| GitError::UserNameUnavailable(e.message().to_string()))?;

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(GitError::UserNameUnavailable("user.name is empty".to_string()).into());
    }
    Ok(name)
}

fn display_name(repo: &Path) -> String {
    repo.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_repo_with_branches(branches: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        fs::write(temp_dir.path().join("README"), "hello").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();
        let commit = repo.find_commit(oid).unwrap();

        for name in branches {
            repo.branch(name, &commit, false).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_list_local_branches_sorted() {
        let temp = create_repo_with_branches(&["zeta", "alpha"]);
        let names = list_local_branches(temp.path()).unwrap();

        assert!(names.contains(&"alpha".to_string()));
        assert!(names.contains(&"zeta".to_string()));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_list_branches_of_plain_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = list_local_branches(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Git(GitError::BranchListing { .. })));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_git_cli_branches_uses_libgit2() {
        let temp = create_repo_with_branches(&["feature"]);
        let names = GitCli::default().branches(temp.path()).await.unwrap();
        assert!(names.contains(&"feature".to_string()));
    }
}
