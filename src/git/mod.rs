//! Git access and log parsing
//!
//! `source` talks to repositories; `log_parser` turns `git log` text into
//! commits filtered by author.

pub mod log_parser;
pub mod source;

pub use log_parser::{parse_log, AuthorFilter};
pub use source::{GitCli, GitSource};
