//! Error types for input file ingestion.

use std::path::PathBuf;

use inca_map::MappingError;
use thiserror::Error;

/// Errors that can occur while reading input files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Tabular Errors ===
    /// Failed to parse a CSV or TSV file.
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required column not found.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A row could not be interpreted.
    #[error("{path}, line {line}: {reason}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// A code table row broke a table invariant.
    #[error("{path}: {source}")]
    Mapping {
        path: PathBuf,
        #[source]
        source: MappingError,
    },

    // === JSON Errors ===
    /// Failed to parse JSON.
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report JSON does not have the expected layout.
    #[error("unexpected report layout in {path}: {reason}")]
    ReportFormat { path: PathBuf, reason: String },

    /// Field map entry is not usable.
    #[error("invalid field map entry '{key}': {reason}")]
    FieldMap { key: String, reason: String },

    /// Query path could not be parsed.
    #[error("invalid query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
