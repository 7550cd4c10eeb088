//! Shared delimited-file helpers.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use inca_model::CaseInsensitiveHeaders;

use crate::error::{IngestError, Result};

/// Open a tab-separated file. Quotes are literal text in these files.
pub(crate) fn tsv_reader(path: &Path, has_headers: bool) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

pub(crate) fn csv_reader(path: &Path) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

pub(crate) fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Index of a required header column.
pub(crate) fn require_column(
    headers: &CaseInsensitiveHeaders,
    column: &str,
    path: &Path,
) -> Result<usize> {
    headers
        .position(column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}

/// Trimmed cell value, empty when the row is short.
pub(crate) fn cell(record: &StringRecord, index: usize) -> &str {
    record
        .get(index)
        .map(|value| value.trim().trim_matches('\u{feff}'))
        .unwrap_or("")
}

pub(crate) fn line_of(record: &StringRecord) -> u64 {
    record.position().map(csv::Position::line).unwrap_or(0)
}

pub(crate) fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|value| value.trim().is_empty())
}
