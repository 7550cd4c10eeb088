//! Generated mapping and manual override tables.

use std::collections::BTreeMap;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use inca_map::CodeTable;
use inca_model::CaseInsensitiveHeaders;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::tsv::{cell, csv_error, is_blank, line_of, require_column, tsv_reader};

const MAPPING_COLUMNS: [&str; 3] = ["panel_id", "code", "condition"];

/// Read a generated mapping written by [`write_mapping_table`].
pub fn read_mapping_table(path: &Path) -> Result<CodeTable> {
    let mut reader = tsv_reader(path, true)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let lookup = CaseInsensitiveHeaders::new(headers.iter());
    let id_idx = require_column(&lookup, MAPPING_COLUMNS[0], path)?;
    let code_idx = require_column(&lookup, MAPPING_COLUMNS[1], path)?;
    let condition_idx = lookup.position(MAPPING_COLUMNS[2]);

    let mut table = CodeTable::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        if is_blank(&record) {
            continue;
        }
        let code = cell(&record, code_idx);
        if code.is_empty() {
            return Err(IngestError::MalformedRow {
                path: path.to_path_buf(),
                line: line_of(&record),
                reason: "mapping row has no code".to_string(),
            });
        }
        let condition = condition_idx
            .map(|idx| cell(&record, idx))
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        table
            .insert(cell(&record, id_idx), code, condition)
            .map_err(|source| IngestError::Mapping {
                path: path.to_path_buf(),
                source,
            })?;
    }
    debug!(path = %path.display(), entries = table.len(), "mapping table loaded");
    Ok(table)
}

/// Contents of the hand-curated override table.
#[derive(Debug, Clone, Default)]
pub struct ManualOverrides {
    /// Rows with a code.
    pub codes: CodeTable,
    /// `new_panel` of rows curated without a code, keyed by `raw_panel`.
    pub conditions: BTreeMap<String, String>,
}

/// Read the hand-curated override table (`raw_panel`, `new_panel`, `r_code`).
///
/// Rows without a code only contribute their condition name.
pub fn read_manual_overrides(path: &Path) -> Result<ManualOverrides> {
    let mut reader = tsv_reader(path, true)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let lookup = CaseInsensitiveHeaders::new(headers.iter());
    let raw_idx = require_column(&lookup, "raw_panel", path)?;
    let new_idx = require_column(&lookup, "new_panel", path)?;
    let code_idx = require_column(&lookup, "r_code", path)?;

    let mut overrides = ManualOverrides::default();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        if is_blank(&record) {
            continue;
        }
        let raw_panel = cell(&record, raw_idx);
        let condition = Some(cell(&record, new_idx))
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let Some(code) = normalize_override_code(cell(&record, code_idx)) else {
            match condition {
                Some(condition) if !raw_panel.is_empty() => {
                    overrides.conditions.insert(raw_panel.to_string(), condition);
                }
                _ => skipped += 1,
            }
            continue;
        };
        overrides
            .codes
            .insert(raw_panel, code, condition)
            .map_err(|source| IngestError::Mapping {
                path: path.to_path_buf(),
                source,
            })?;
    }
    debug!(
        path = %path.display(),
        entries = overrides.codes.len(),
        conditions = overrides.conditions.len(),
        skipped,
        "manual overrides loaded"
    );
    Ok(overrides)
}

/// Curated codes are stored as bare numbers; give them the `R` prefix.
pub fn normalize_override_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with(['R', 'r']) {
        let mut code = String::from("R");
        code.push_str(&trimmed[1..]);
        Some(code)
    } else {
        Some(format!("R{trimmed}"))
    }
}

/// Write a mapping table as TSV.
pub fn write_mapping_table(path: &Path, table: &CodeTable) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_path(path)
        .map_err(|source| csv_error(path, source))?;
    writer
        .write_record(MAPPING_COLUMNS)
        .map_err(|source| csv_error(path, source))?;
    for (panel_id, entry) in table.iter() {
        writer
            .write_record([
                panel_id,
                entry.code.as_str(),
                entry.condition.as_deref().unwrap_or(""),
            ])
            .map_err(|source| csv_error(path, source))?;
    }
    writer.flush().map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_codes_get_prefix() {
        assert_eq!(normalize_override_code("134").as_deref(), Some("R134"));
        assert_eq!(normalize_override_code("R59").as_deref(), Some("R59"));
        assert_eq!(normalize_override_code("r59").as_deref(), Some("R59"));
        assert_eq!(normalize_override_code("  "), None);
    }
}
