//! Sample manifest reader.
//!
//! The manifest is the provider's spreadsheet exported as CSV. Only two
//! columns matter: the laboratory sample number and the `;`-separated panel
//! selection.

use std::collections::BTreeMap;
use std::path::Path;

use inca_model::{CaseInsensitiveHeaders, panel_identifier};
use tracing::debug;

use crate::error::Result;
use crate::tsv::{cell, csv_error, csv_reader, is_blank, require_column};

pub const SAMPLE_COLUMN: &str = "CUH sample number";
pub const PANELS_COLUMN: &str = "Panels";

/// Panel selection for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleEntry {
    pub sample_number: String,
    /// Raw panel elements as written in the manifest.
    pub panels: Vec<String>,
}

impl SampleEntry {
    /// Identifier used to look the selection up in the code tables.
    pub fn panel_id(&self) -> String {
        panel_identifier(&self.panels)
    }

    /// Panel column value written to records: elements trimmed of
    /// underscores on both sides.
    pub fn panel_label(&self) -> String {
        self.panels
            .iter()
            .map(|panel| panel.trim_matches('_'))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// All manifest samples keyed by upper-cased sample number.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    samples: BTreeMap<String, SampleEntry>,
}

impl Manifest {
    pub fn from_entries<I: IntoIterator<Item = SampleEntry>>(entries: I) -> Self {
        let mut samples = BTreeMap::new();
        for mut entry in entries {
            entry.sample_number = entry.sample_number.trim().to_uppercase();
            samples.insert(entry.sample_number.clone(), entry);
        }
        Self { samples }
    }

    pub fn get(&self, sample_number: &str) -> Option<&SampleEntry> {
        self.samples.get(&sample_number.trim().to_uppercase())
    }

    pub fn samples(&self) -> impl Iterator<Item = &SampleEntry> {
        self.samples.values()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Split a manifest panel cell into its elements.
pub fn split_panels(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|panel| !panel.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the manifest CSV. A repeated sample number keeps its last row.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let mut reader = csv_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let lookup = CaseInsensitiveHeaders::new(headers.iter());
    let sample_idx = require_column(&lookup, SAMPLE_COLUMN, path)?;
    let panels_idx = require_column(&lookup, PANELS_COLUMN, path)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        if is_blank(&record) {
            continue;
        }
        let sample_number = cell(&record, sample_idx);
        if sample_number.is_empty() {
            continue;
        }
        entries.push(SampleEntry {
            sample_number: sample_number.to_string(),
            panels: split_panels(cell(&record, panels_idx)),
        });
    }
    let row_count = entries.len();
    let manifest = Manifest::from_entries(entries);
    if manifest.len() < row_count {
        debug!(
            rows = row_count,
            samples = manifest.len(),
            "manifest has repeated sample numbers"
        );
    }
    debug!(path = %path.display(), samples = manifest.len(), "manifest loaded");
    Ok(manifest)
}
