//! Provider report files.
//!
//! A usable report is a JSON array of exactly three elements whose last
//! element holds `data.evaluations`. Anything else is a report without data.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{IngestError, Result};

static SAMPLE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<gm_number>GM[0-9]{2}_[0-9]+)").expect("valid sample number pattern")
});

/// A parsed report with its evaluations.
#[derive(Debug, Clone)]
pub struct Report {
    pub path: PathBuf,
    /// File stem, used to label evaluations.
    pub stem: String,
    /// Laboratory sample number derived from the file name.
    pub sample_number: Option<String>,
    /// Evaluations in report order; `None` marks an empty slot.
    pub evaluations: Vec<Option<Value>>,
}

impl Report {
    /// Label of the evaluation at zero-based `index`: `<stem>-<index + 1>`.
    pub fn evaluation_label(&self, index: usize) -> String {
        format!("{}-{}", self.stem, index + 1)
    }
}

/// Outcome of reading one report file.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Parsed(Report),
    /// The file is valid JSON but carries no data.
    NoData { path: PathBuf },
}

/// Sample number embedded in a report path, e.g. `GM23_1234` -> `GM23.1234`.
pub fn sample_number_from_path(path: &Path) -> Option<String> {
    let text = path.to_string_lossy();
    SAMPLE_NUMBER
        .captures(&text)
        .and_then(|caps| caps.name("gm_number"))
        .map(|found| found.as_str().replace('_', ".").to_uppercase())
}

/// Read and shape-check a report file.
pub fn read_report(path: &Path) -> Result<ReportOutcome> {
    let contents = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    parse_report(path, value)
}

/// Shape-check an already parsed report document.
pub fn parse_report(path: &Path, value: Value) -> Result<ReportOutcome> {
    let Value::Array(mut parts) = value else {
        return Ok(ReportOutcome::NoData {
            path: path.to_path_buf(),
        });
    };
    if parts.len() != 3 {
        return Ok(ReportOutcome::NoData {
            path: path.to_path_buf(),
        });
    }
    let payload = parts.swap_remove(2);
    let evaluations = match payload.pointer("/data/evaluations") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => None,
                other => Some(other.clone()),
            })
            .collect(),
        Some(Value::Null) => Vec::new(),
        Some(_) => {
            return Err(IngestError::ReportFormat {
                path: path.to_path_buf(),
                reason: "data.evaluations is not an array".to_string(),
            });
        }
        None => {
            return Err(IngestError::ReportFormat {
                path: path.to_path_buf(),
                reason: "missing data.evaluations".to_string(),
            });
        }
    };
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("report")
        .to_string();
    Ok(ReportOutcome::Parsed(Report {
        path: path.to_path_buf(),
        stem,
        sample_number: sample_number_from_path(path),
        evaluations,
    }))
}
