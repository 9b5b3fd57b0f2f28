//! Writers for mapped output.
//!
//! Mapped entries are written either as NDJSON (one object per line) or as
//! a single JSON array, which is what static-site build steps usually want.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::field_mapper::MappedFields;

/// Error type for serialization operations
#[derive(Debug)]
pub enum SerializationError {
    JsonError(serde_json::Error),
    IoError(std::io::Error),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::JsonError(err)
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::IoError(err)
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::JsonError(e) => write!(f, "JSON error: {}", e),
            SerializationError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for SerializationError {}

/// Output layout for mapped entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Ndjson,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ndjson" | "jsonl" => Ok(OutputFormat::Ndjson),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format '{}' (expected ndjson or json)", other)),
        }
    }
}

/// NDJSON (Newline Delimited JSON) writer
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single record as an NDJSON line
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), SerializationError> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// JSON array writer
///
/// Writes records as a pretty-printed JSON array, element by element.
pub struct JsonArrayWriter<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonArrayWriter<W> {
    /// Create a new JSON array writer and write the opening bracket
    pub fn new(mut writer: W) -> Result<Self, SerializationError> {
        write!(writer, "[")?;
        Ok(Self {
            writer,
            first: true,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), SerializationError> {
        if !self.first {
            write!(self.writer, ",")?;
        }
        self.first = false;

        writeln!(self.writer)?;
        serde_json::to_writer_pretty(&mut self.writer, record)?;
        Ok(())
    }

    /// Close the bracket and flush
    pub fn finish(mut self) -> Result<(), SerializationError> {
        if !self.first {
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "]")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Write mapped entries to `writer` in the given format
pub fn write_mapped<W: Write>(
    writer: W,
    format: OutputFormat,
    records: &[MappedFields],
) -> Result<(), SerializationError> {
    match format {
        OutputFormat::Ndjson => {
            let mut out = NdjsonWriter::new(writer);
            for record in records {
                out.write(record)?;
            }
            out.flush()
        }
        OutputFormat::Json => {
            let mut out = JsonArrayWriter::new(writer)?;
            for record in records {
                out.write(record)?;
            }
            out.finish()
        }
    }
}
