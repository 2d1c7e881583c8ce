use crate::error::{ConfigError, Error, Result};
use crate::git::AuthorFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up in the scanned root when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = ".git-recap.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Author patterns; empty means "use git's user.name"
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_since_days")]
    pub since_days: u32,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_git_timeout")]
    pub git_timeout_secs: u64,
    #[serde(default = "default_require_git_dir")]
    pub require_git_dir: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub group_by_branch: bool,
    /// Fixed banner width; detected from the terminal when unset
    #[serde(default)]
    pub width: Option<usize>,
}

fn default_since_days() -> u32 {
    7
}

fn default_concurrency() -> usize {
    4
}

fn default_git_timeout() -> u64 {
    30
}

fn default_require_git_dir() -> bool {
    true
}

fn default_format() -> String {
    "shell".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            since_days: default_since_days(),
            concurrency: default_concurrency(),
            git_timeout_secs: default_git_timeout(),
            require_git_dir: default_require_git_dir(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            group_by_branch: false,
            width: None,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub authors: Option<String>,
    pub since_days: Option<u32>,
    pub format: Option<String>,
    pub group_by_branch: bool,
    pub concurrency: Option<usize>,
    pub git_timeout_secs: Option<u64>,
    pub width: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| {
            Error::Config(ConfigError::ReadFailed {
                path: path.display().to_string(),
                source,
            })
        })?;

        toml::from_str(&contents).map_err(|e| {
            Error::Config(ConfigError::ParseFailed {
                path: path.display().to_string(),
                source: e.to_string(),
            })
        })
    }

    /// Load `.git-recap.toml` from `root` if present, defaults otherwise
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Layer command-line values on top of this configuration
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(authors) = overrides.authors {
            self.authors = authors.split(',').map(str::to_string).collect();
        }
        if let Some(days) = overrides.since_days {
            self.scan.since_days = days;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.group_by_branch {
            self.output.group_by_branch = true;
        }
        if let Some(jobs) = overrides.concurrency {
            self.scan.concurrency = jobs;
        }
        if let Some(secs) = overrides.git_timeout_secs {
            self.scan.git_timeout_secs = secs;
        }
        if let Some(width) = overrides.width {
            self.output.width = Some(width);
        }
    }

    /// Reject values the scanner cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.scan.concurrency == 0 {
            return Err(invalid("scan.concurrency", "must be at least 1"));
        }
        if self.scan.git_timeout_secs == 0 {
            return Err(invalid("scan.git_timeout_secs", "must be at least 1"));
        }
        if self.output.width == Some(0) {
            return Err(invalid("output.width", "must be at least 1"));
        }
        Ok(())
    }

    /// Author filter from the configured patterns (may be empty)
    pub fn author_filter(&self) -> AuthorFilter {
        AuthorFilter::new(&self.authors)
    }
}

fn invalid(field: &str, details: &str) -> Error {
    Error::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        details: details.to_string(),
    })
}
