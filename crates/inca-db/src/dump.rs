//! JSON dumps of import-ready records.

use std::fs;
use std::path::Path;

use inca_model::ImportRecord;
use tracing::info;

use crate::error::{DbError, Result};

/// Default dump file name.
pub const DEFAULT_DUMP_FILE: &str = "json_dump_ready_for_import.json";

/// Write `records` as a pretty-printed JSON array.
pub fn write_dump(path: &Path, records: &[ImportRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|source| DbError::DumpFormat {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| DbError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), records = records.len(), "dump written");
    Ok(())
}

/// Read a dump written by [`write_dump`].
pub fn load_dump(path: &Path) -> Result<Vec<ImportRecord>> {
    let content = fs::read_to_string(path).map_err(|source| DbError::DumpRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DbError::DumpFormat {
        path: path.to_path_buf(),
        source,
    })
}
