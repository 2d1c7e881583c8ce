//! Parser for `git log` medium-format output
//!
//! Turns the raw log of one branch into [`Commit`] records, keeping only
//! commits whose author matches an [`AuthorFilter`]. The expected layout is:
//!
//! ```text
//! commit 1945ab9c752534e733c38ba0109dc3b741f0a6eb
//! Author: Alice Smith <alice@example.com>
//! Date:   Wed Jan 3 10:00:00 2024 +0000
//!
//!     Add health check endpoint
//!
//!     Longer description.
//! ```

use crate::error::{ParseError, Result};
use crate::model::Commit;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Date layout printed by `git log --date=default`
pub const GIT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

fn commit_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^commit ([0-9a-fA-F]+)").expect("commit line regex"))
}

fn header_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]+):\s*(.*)$").expect("header line regex"))
}

/// Case-insensitive author allow-list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    /// Upper-cased, trimmed, non-empty patterns
    patterns: Vec<String>,
}

impl AuthorFilter {
    /// Build a filter, dropping blank patterns
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_uppercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// Build a filter from a comma separated list, e.g. `"alice,bob"`
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// True when no usable pattern was given. An empty filter matches nothing.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check whether `author` contains any pattern, ignoring case
    pub fn matches(&self, author: &str) -> bool {
        let author = author.to_uppercase();
        self.patterns.iter().any(|p| author.contains(p.as_str()))
    }
}

/// Header fields collected for the stanza being read
#[derive(Debug, Default)]
struct Stanza {
    hash: String,
    author: Option<String>,
    date: Option<String>,
    subject: Option<String>,
    in_message: bool,
}

impl Stanza {
    fn start(hash: &str) -> Self {
        Self {
            hash: hash.to_string(),
            ..Default::default()
        }
    }

    fn into_commit(self) -> Result<Commit> {
        let author = self.author.ok_or_else(|| ParseError::MissingField {
            hash: self.hash.clone(),
            field: "Author",
        })?;
        let raw_date = self.date.ok_or_else(|| ParseError::MissingField {
            hash: self.hash.clone(),
            field: "Date",
        })?;
        let date = parse_git_date(&raw_date)?;

        Ok(Commit {
            name: self.subject.unwrap_or_default(),
            author,
            date,
            hash: self.hash,
        })
    }
}

/// Parse a `Date:` header value such as `Mon Jan 2 15:04:05 2006 -0700`
pub fn parse_git_date(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_str(value, GIT_DATE_FORMAT).map_err(|e| {
        ParseError::InvalidDate {
            value: value.to_string(),
            source: e.to_string(),
        }
        .into()
    })
}

/// Parse one branch's log text into commits written by `filter`'s authors.
///
/// Commits keep their log order. Any malformed stanza fails the whole call;
/// nothing parsed so far is returned in that case.
pub fn parse_log(text: &str, filter: &AuthorFilter) -> Result<Vec<Commit>> {
    let mut commits = Vec::new();
    let mut current: Option<Stanza> = None;
    let mut seen = 0usize;

    for (index, line) in text.lines().enumerate() {
        if let Some(caps) = commit_line().captures(line) {
            if let Some(stanza) = current.take() {
                push_matching(&mut commits, stanza, filter)?;
            }
            current = Some(Stanza::start(&caps[1]));
            seen += 1;
            continue;
        }

        let Some(stanza) = current.as_mut() else {
            if line.trim().is_empty() {
                continue;
            }
            return Err(ParseError::UnexpectedLine {
                line_number: index + 1,
                line: line.to_string(),
            }
            .into());
        };

        if stanza.in_message {
            if stanza.subject.is_none() && !line.trim().is_empty() {
                stanza.subject = Some(line.trim().to_string());
            }
            continue;
        }

        if line.trim().is_empty() {
            stanza.in_message = true;
            continue;
        }

        if let Some(caps) = header_line().captures(line) {
            let value = caps[2].trim().to_string();
            match &caps[1] {
                "Author" => stanza.author = Some(value),
                "Date" => stanza.date = Some(value),
                _ => {}
            }
        }
    }

    if let Some(stanza) = current.take() {
        push_matching(&mut commits, stanza, filter)?;
    }

    debug!("Parsed {} stanzas, {} matched the author filter", seen, commits.len());
    Ok(commits)
}

fn push_matching(commits: &mut Vec<Commit>, stanza: Stanza, filter: &AuthorFilter) -> Result<()> {
    let commit = stanza.into_commit()?;
    if filter.matches(&commit.author) {
        commits.push(commit);
    }
    Ok(())
}
