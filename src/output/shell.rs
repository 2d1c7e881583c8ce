//! Colored, human-readable report
//!
//! Each project gets a banner sized to the terminal, followed by its
//! commits either grouped per branch or merged and sorted newest first.
//! Repositories that failed are listed at the end.

use super::terminal::{detect_width, resolve_width};
use super::{write_failed, ReportWriter};
use crate::error::Result;
use crate::model::{Commit, Project, Report};
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// How commits are ordered inside a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitOrder {
    /// All branches merged, newest first
    #[default]
    ByDate,
    /// One block per branch, in log order
    ByBranch,
}

impl CommitOrder {
    pub fn from_group_by_branch(group_by_branch: bool) -> Self {
        if group_by_branch {
            CommitOrder::ByBranch
        } else {
            CommitOrder::ByDate
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellOptions {
    pub order: CommitOrder,
    /// Banner width; detected from the terminal when `None`
    pub width: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ShellWriter {
    options: ShellOptions,
}

/// A commit tagged with the branch it was found on
#[derive(Debug, Clone, Copy)]
pub struct BranchCommit<'a> {
    pub branch: &'a str,
    pub commit: &'a Commit,
}

impl ShellWriter {
    pub fn new(options: ShellOptions) -> Self {
        Self { options }
    }

    /// Render the whole report for a terminal `width` columns wide
    pub fn render(&self, report: &Report, width: usize) -> String {
        let mut text = String::new();

        for project in &report.projects {
            text.push_str(&banner(&project.name, width));
            text.push('\n');

            match self.options.order {
                CommitOrder::ByBranch => render_by_branch(&mut text, project),
                CommitOrder::ByDate => render_by_date(&mut text, project),
            }
        }

        render_failed(&mut text, &report.failed);
        text
    }
}

impl ReportWriter for ShellWriter {
    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<()> {
        let width = resolve_width(self.options.width, detect_width);
        let text = self.render(report, width);
        out.write_all(text.as_bytes()).map_err(write_failed)?;
        out.flush().map_err(write_failed)
    }
}

/// Center `name` between dashes so the line is exactly `width` columns.
///
/// Names wider than the terminal are printed as-is.
pub fn banner(name: &str, width: usize) -> String {
    let len = name.chars().count();
    if len > width {
        return name.to_string();
    }

    let dashes = width - len;
    let side = "-".repeat(dashes / 2);
    let extra = if dashes % 2 == 1 { "-" } else { "" };
    format!("{side}{name}{side}{extra}")
}

/// Every commit of `project` with its branch, newest first.
///
/// The sort is stable: equal timestamps keep branch order, then log order.
pub fn commits_by_date(project: &Project) -> Vec<BranchCommit<'_>> {
    let mut commits: Vec<BranchCommit<'_>> = project
        .branches
        .iter()
        .flat_map(|branch| {
            branch.commits.iter().map(move |commit| BranchCommit {
                branch: &branch.name,
                commit,
            })
        })
        .collect();

    commits.sort_by(|a, b| b.commit.date.cmp(&a.commit.date));
    commits
}

fn render_by_branch(text: &mut String, project: &Project) {
    for branch in &project.branches {
        text.push_str(&format!("\t+ {}\n", branch.name.green()));
        for commit in &branch.commits {
            text.push_str(&format!(
                "\t\t- {} {} {}\n",
                commit.author.cyan(),
                commit.date.format(DATE_FORMAT),
                commit.name.yellow()
            ));
        }
    }
}

fn render_by_date(text: &mut String, project: &Project) {
    for entry in commits_by_date(project) {
        text.push_str(&format!(
            "\t- {} {} {} {}\n",
            entry.commit.author.cyan(),
            entry.branch.green(),
            entry.commit.date.format(DATE_FORMAT),
            entry.commit.name.yellow()
        ));
    }
}

fn render_failed(text: &mut String, failed: &BTreeMap<String, String>) {
    if failed.is_empty() {
        return;
    }

    text.push_str(&format!("\n{}\n", "Failed:".red().bold()));
    for (name, message) in failed {
        text.push_str(&format!("{}\n", format!("\t* {}: {}", name, message).red()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn commit(subject: &str, date: &str) -> Commit {
        Commit::new(
            subject,
            "Alice <alice@example.com>",
            DateTime::parse_from_rfc3339(date).unwrap(),
            format!("hash-{}", subject),
        )
    }

    fn repo_a() -> Project {
        let mut project = Project::new("repoA", "/src/repoA");
        let main = project.add_branch("main");
        main.add_commit(commit("jan3", "2024-01-03T10:00:00Z"));
        main.add_commit(commit("jan1", "2024-01-01T09:00:00Z"));
        project
            .add_branch("dev")
            .add_commit(commit("jan2", "2024-01-02T08:00:00Z"));
        project
    }

    #[test]
    fn test_banner_even_padding() {
        assert_eq!(banner("api", 9), "---api---");
    }

    #[test]
    fn test_banner_odd_padding_adds_trailing_dash() {
        assert_eq!(banner("api", 10), "---api----");
    }

    #[test]
    fn test_banner_exact_width() {
        assert_eq!(banner("api", 3), "api");
    }

    #[test]
    fn test_banner_wider_than_terminal() {
        assert_eq!(banner("twelve-chars", 10), "twelve-chars");
    }

    #[test]
    fn test_commits_by_date_order() {
        let project = repo_a();
        let order: Vec<_> = commits_by_date(&project)
            .iter()
            .map(|c| (c.branch, c.commit.name.as_str()))
            .collect();
        assert_eq!(order, vec![("main", "jan3"), ("dev", "jan2"), ("main", "jan1")]);
    }

    #[test]
    fn test_commits_by_date_ties_keep_branch_order() {
        let mut project = Project::new("tie", "/src/tie");
        project
            .add_branch("main")
            .add_commit(commit("first", "2024-01-02T08:00:00Z"));
        project
            .add_branch("dev")
            .add_commit(commit("second", "2024-01-02T08:00:00Z"));

        let order: Vec<_> = commits_by_date(&project)
            .iter()
            .map(|c| c.commit.name.as_str())
            .collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_ties_across_offsets_compare_instants() {
        let mut project = Project::new("tz", "/src/tz");
        project
            .add_branch("main")
            .add_commit(commit("utc", "2024-01-02T08:00:00Z"));
        project
            .add_branch("dev")
            .add_commit(commit("later", "2024-01-02T09:30:00+01:00"));

        let order: Vec<_> = commits_by_date(&project)
            .iter()
            .map(|c| c.commit.name.as_str())
            .collect();
        assert_eq!(order, vec!["later", "utc"]);
    }

    #[test]
    fn test_render_grouped_by_branch() {
        let mut report = Report::new();
        report.push_project(repo_a());

        let writer = ShellWriter::new(ShellOptions {
            order: CommitOrder::ByBranch,
            width: None,
        });
        let text = writer.render(&report, 20);

        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(text.starts_with("-------repoA--------\n"));
        assert!(pos("main") < pos("jan3"));
        assert!(pos("jan3") < pos("jan1"));
        assert!(pos("jan1") < pos("dev"));
        assert!(pos("dev") < pos("jan2"));
    }

    #[test]
    fn test_failed_section_omitted_when_empty() {
        let mut report = Report::new();
        report.push_project(repo_a());
        let text = ShellWriter::default().render(&report, 80);
        assert!(!text.contains("Failed:"));
    }
}
