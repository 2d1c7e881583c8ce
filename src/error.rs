//! Error types for git-recap
//!
//! Failures are grouped by where they happen:
//! - Git operations (branch listing, log retrieval, user lookup)
//! - Log parsing (malformed stanzas, unparseable dates)
//! - Output (unknown format, serialization)
//! - Configuration (bad TOML, invalid values)
//! - File I/O (scanning the root directory)
//!
//! The `Display` output of an [`Error`] is also its stable representation in
//! the `failed` section of a report.

use std::fmt;
use std::io;

/// Result type alias for git-recap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for git-recap
#[derive(Debug)]
pub enum Error {
    /// Git operation errors
    Git(GitError),
    /// Log text parsing errors
    Parse(ParseError),
    /// Report rendering errors
    Output(OutputError),
    /// Configuration errors
    Config(ConfigError),
    /// I/O errors
    Io(IoError),
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
    /// Branch list could not be read
    BranchListing { repo: String, source: String },
    /// `git log` failed for one branch
    LogRetrieval {
        repo: String,
        branch: String,
        source: String,
    },
    /// A git invocation exceeded its deadline
    Timeout { operation: String, secs: u64 },
    /// No `user.name` in the git configuration
    UserNameUnavailable(String),
}

/// Log parsing errors
#[derive(Debug)]
pub enum ParseError {
    /// Date header did not match the expected layout
    InvalidDate { value: String, source: String },
    /// Stanza lacks a required header
    MissingField { hash: String, field: &'static str },
    /// Line outside of any commit stanza
    UnexpectedLine { line_number: usize, line: String },
}

/// Report rendering errors
#[derive(Debug)]
pub enum OutputError {
    /// Format selector is not one of shell/json/yaml
    UnsupportedFormat(String),
    /// Structured serializer failed
    SerializeFailed { format: String, source: String },
    /// Writing to the sink failed
    WriteFailed(io::Error),
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    ReadFailed { path: String, source: io::Error },
    /// Configuration file could not be parsed
    ParseFailed { path: String, source: String },
    /// A value is out of range
    InvalidValue { field: String, details: String },
}

/// File I/O errors
#[derive(Debug)]
pub enum IoError {
    /// Failed to list a directory
    ReadDirFailed { path: String, source: io::Error },
    /// Other I/O error
    Other(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Git(e) => write!(f, "Git error: {}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Output(e) => write!(f, "Output error: {}", e),
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitError::BranchListing { repo, source } => {
                write!(f, "failed to list branches of {}: {}", repo, source)
            }
            GitError::LogRetrieval {
                repo,
                branch,
                source,
            } => {
                write!(
                    f,
                    "git log failed for branch '{}' in {}: {}",
                    branch, repo, source
                )
            }
            GitError::Timeout { operation, secs } => {
                write!(f, "'{}' timed out after {}s", operation, secs)
            }
            GitError::UserNameUnavailable(source) => {
                write!(f, "no git user.name configured: {}", source)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidDate { value, source } => {
                write!(f, "invalid commit date '{}': {}", value, source)
            }
            ParseError::MissingField { hash, field } => {
                write!(f, "commit {} has no {} header", hash, field)
            }
            ParseError::UnexpectedLine { line_number, line } => {
                write!(f, "unexpected line {} outside a commit: {}", line_number, line)
            }
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::UnsupportedFormat(format) => {
                write!(
                    f,
                    "no writer for output type '{}' (expected shell, json or yaml)",
                    format
                )
            }
            OutputError::SerializeFailed { format, source } => {
                write!(f, "failed to serialize report as {}: {}", format, source)
            }
            OutputError::WriteFailed(source) => write!(f, "failed to write report: {}", source),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            ConfigError::ParseFailed { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            ConfigError::InvalidValue { field, details } => {
                write!(f, "invalid value for {}: {}", field, details)
            }
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::ReadDirFailed { path, source } => {
                write!(f, "failed to read directory {}: {}", path, source)
            }
            IoError::Other(source) => write!(f, "{}", source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(IoError::ReadDirFailed { source, .. })
            | Error::Io(IoError::Other(source))
            | Error::Config(ConfigError::ReadFailed { source, .. })
            | Error::Output(OutputError::WriteFailed(source)) => Some(source),
            _ => None,
        }
    }
}

impl std::error::Error for GitError {}
impl std::error::Error for ParseError {}
impl std::error::Error for OutputError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for IoError {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(IoError::Other(err))
    }
}

impl From<GitError> for Error {
    fn from(err: GitError) -> Self {
        Error::Git(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<OutputError> for Error {
    fn from(err: OutputError) -> Self {
        Error::Output(err)
    }
}

impl Error {
    /// Check if error should abort the whole run rather than one repository
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::Output(OutputError::UnsupportedFormat(_))
                | Error::Io(IoError::ReadDirFailed { .. })
                | Error::Git(GitError::UserNameUnavailable(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_log_retrieval_display() {
        let err = Error::Git(GitError::LogRetrieval {
            repo: "api".to_string(),
            branch: "dev".to_string(),
            source: "exit status: 128".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Git error: git log failed for branch 'dev' in api: exit status: 128"
        );
    }

    #[test]
    fn test_invalid_date_display() {
        let err = Error::Parse(ParseError::InvalidDate {
            value: "yesterday".to_string(),
            source: "input contains invalid characters".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Parse error: invalid commit date 'yesterday': input contains invalid characters"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = Error::Output(OutputError::UnsupportedFormat("xml".to_string()));
        assert_eq!(
            err.to_string(),
            "Output error: no writer for output type 'xml' (expected shell, json or yaml)"
        );
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::Output(OutputError::UnsupportedFormat("csv".to_string())).is_fatal());
        assert!(Error::Io(IoError::ReadDirFailed {
            path: "/nope".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        })
        .is_fatal());

        let per_repo = Error::Git(GitError::BranchListing {
            repo: "web".to_string(),
            source: "not a repository".to_string(),
        });
        assert!(!per_repo.is_fatal());

        let timeout = Error::Git(GitError::Timeout {
            operation: "git log main".to_string(),
            secs: 30,
        });
        assert!(!timeout.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(IoError::Other(_))));
        assert!(err.source().is_some());
    }
}
