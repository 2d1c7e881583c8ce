//! Report rendering
//!
//! One [`ReportWriter`] per output format, picked by [`writer_for`]. The
//! format selector is resolved before anything is written, so an unknown
//! format never produces partial output.

pub mod shell;
pub mod structured;
pub mod terminal;

use crate::error::{Error, OutputError, Result};
use crate::model::Report;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub use shell::{CommitOrder, ShellOptions, ShellWriter};
pub use structured::{JsonWriter, YamlWriter};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Shell,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Shell => "shell",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "shell" => Ok(OutputFormat::Shell),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(Error::Output(OutputError::UnsupportedFormat(other.to_string()))),
        }
    }
}

/// Renders a finished report to a sink
pub trait ReportWriter {
    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<()>;
}

/// Writer for `format`; shell options are ignored by structured formats
pub fn writer_for(format: OutputFormat, shell: ShellOptions) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Shell => Box::new(ShellWriter::new(shell)),
        OutputFormat::Json => Box::new(JsonWriter),
        OutputFormat::Yaml => Box::new(YamlWriter),
    }
}

/// Resolve `selector` and render `report` with the matching writer
pub fn write_output(
    report: &Report,
    out: &mut dyn Write,
    selector: &str,
    shell: ShellOptions,
) -> Result<()> {
    let format: OutputFormat = selector.parse()?;
    writer_for(format, shell).write(report, out)
}

pub(crate) fn write_failed(err: std::io::Error) -> Error {
    Error::Output(OutputError::WriteFailed(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_formats() {
        assert_eq!("shell".parse::<OutputFormat>().unwrap(), OutputFormat::Shell);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
    }

    #[test]
    fn test_unknown_format_writes_nothing() {
        let mut out = Vec::new();
        let err = write_output(&Report::new(), &mut out, "xml", ShellOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Output(OutputError::UnsupportedFormat(ref f)) if f == "xml"
        ));
        assert!(err.is_fatal());
        assert!(out.is_empty());
    }

    #[test]
    fn test_format_names_round_trip() {
        for format in [OutputFormat::Shell, OutputFormat::Json, OutputFormat::Yaml] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }
}
