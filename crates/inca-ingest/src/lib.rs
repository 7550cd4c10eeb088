//! Input readers for the INCA import.
//!
//! - **Panel dump**: panel database export, one panel per TSV line
//! - **Manifest**: sample number to panel selection, CSV export of the
//!   provider spreadsheet
//! - **Code tables**: generated mapping and manual overrides (TSV)
//! - **Field map**: JSON description of report value extraction
//! - **Reports**: provider report JSON files
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use inca_ingest::{read_manifest, read_panel_dump, read_manual_overrides};
//!
//! let panels = read_panel_dump(Path::new("panelapp_dump.tsv"))?;
//! let manifest = read_manifest(Path::new("medicover.csv"))?;
//! let overrides = read_manual_overrides(Path::new("rescued_panels.tsv"))?;
//! ```

mod discovery;
mod error;
mod field_map;
mod manifest;
mod panel_dump;
mod query;
mod report;
mod tables;
mod tsv;

// === Error Types ===
pub use error::{IngestError, Result};

// === Discovery ===
pub use discovery::{expand_report_paths, list_json_files};

// === Panel Metadata ===
pub use manifest::{Manifest, PANELS_COLUMN, SAMPLE_COLUMN, SampleEntry, read_manifest, split_panels};
pub use panel_dump::{parse_disorder_list, read_panel_dump};
pub use tables::{
    ManualOverrides, normalize_override_code, read_manual_overrides, read_mapping_table, write_mapping_table,
};

// === Reports ===
pub use field_map::{FieldMap, FieldRule, read_field_map};
pub use query::JsonQuery;
pub use report::{Report, ReportOutcome, parse_report, read_report, sample_number_from_path};
