use std::collections::BTreeSet;
use std::path::PathBuf;

use inca_map::{MappingError, Overlap};
use inca_model::{ImportRecord, ResolutionSource};

#[derive(Debug)]
pub struct ImportResult {
    pub records: Vec<ImportRecord>,
    pub reports: Vec<ReportSummary>,
    /// Reports without evaluation data.
    pub skipped: Vec<PathBuf>,
    pub overlaps: Vec<Overlap>,
    /// Panel identifiers of reported samples that no table resolves.
    pub unresolved_panels: BTreeSet<String>,
    /// Reported samples absent from the manifest.
    pub missing_samples: BTreeSet<String>,
    pub errors: Vec<String>,
    /// Manifest samples whose panel identifier was rejected.
    pub panel_errors: Vec<(String, MappingError)>,
    pub dump: Option<PathBuf>,
    pub inserted: Option<u64>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct ReportSummary {
    pub name: String,
    pub sample_number: Option<String>,
    pub source: Option<ResolutionSource>,
    pub evaluations: usize,
    pub records: usize,
    pub issues: usize,
}
