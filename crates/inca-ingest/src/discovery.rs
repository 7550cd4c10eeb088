//! Report file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists all JSON files in a directory, sorted by file name.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Expands report arguments: files are kept as given, directories are
/// replaced by the JSON files they contain.
pub fn expand_report_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut reports = Vec::new();
    for input in inputs {
        if input.is_dir() {
            reports.extend(list_json_files(input)?);
        } else {
            reports.push(input.clone());
        }
    }
    Ok(reports)
}
