//! Error types for the batch processor.
//!
//! Two severities exist. [`ParseError`] is per record and never stops a run
//! on its own; [`BatchError`] is fatal to the run that raised it.

use crate::record::RejectReason;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// A line could not be decoded into an input record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line is shorter than the fixed record width
    #[error("record too short: {len} characters, need at least {min}")]
    TooShort { len: usize, min: usize },

    /// Line ends before a numeric field does
    #[error("record too short: field {field} ends at {end}, line has {len} characters")]
    FieldTruncated {
        field: &'static str,
        end: usize,
        len: usize,
    },

    /// Numeric field is empty or not an integer
    #[error("invalid numeric field {field}: {value:?}")]
    InvalidNumeric { field: &'static str, value: String },
}

/// Errors that end a batch run.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Failed to open the input file
    #[error("cannot open input {}: {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create an output file
    #[error("cannot create output {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read from the input
    #[error("read error at line {line}: {source}")]
    Read {
        line: usize,
        source: std::io::Error,
    },

    /// Failed to write or flush an output
    #[error("write error at line {line}: {source}")]
    Write {
        line: usize,
        source: std::io::Error,
    },

    /// A record was rejected while running with the abort-on-first-error policy
    #[error("record rejected at line {line}: {reason}")]
    Rejected { line: usize, reason: RejectReason },

    /// The record counter exceeded its legacy capacity
    #[error("record count exceeds {limit}")]
    CountOverflow { limit: usize },

    /// Summary could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A fatal error raised after processing began
    #[error("{source} (aborted after {processed} records)")]
    Aborted {
        processed: usize,
        source: Box<BatchError>,
    },
}

impl BatchError {
    /// Number of records fully processed before the run stopped.
    pub fn processed(&self) -> usize {
        match self {
            BatchError::Aborted { processed, .. } => *processed,
            _ => 0,
        }
    }
}
