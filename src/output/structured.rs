//! JSON and YAML writers: a direct serialization of the report

use super::{write_failed, ReportWriter};
use crate::error::{Error, OutputError, Result};
use crate::model::Report;
use std::io::Write;

/// Pretty-printed JSON, two-space indent, trailing newline
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

/// A single YAML document
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlWriter;

impl ReportWriter for JsonWriter {
    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, report).map_err(|e| serialize_failed("json", e))?;
        writeln!(out).map_err(write_failed)
    }
}

impl ReportWriter for YamlWriter {
    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<()> {
        serde_yaml::to_writer(&mut *out, report).map_err(|e| serialize_failed("yaml", e))
    }
}

fn serialize_failed(format: &str, err: impl std::fmt::Display) -> Error {
    Error::Output(OutputError::SerializeFailed {
        format: format.to_string(),
        source: err.to_string(),
    })
}
