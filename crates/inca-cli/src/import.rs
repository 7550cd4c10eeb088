//! Report import pipeline shared by the `import` and `resolve` commands.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{debug, info, info_span, warn};

use inca_ingest::{
    Manifest, ReportOutcome, expand_report_paths, read_field_map, read_manifest,
    read_manual_overrides, read_mapping_table, read_panel_dump, read_report,
};
use inca_map::{CodeTable, Overlap, PanelResolver, check_overlaps, generate_mapping};
use inca_model::{ResolutionSource, fill_missing_keys};
use inca_transform::{RecordContext, SampleResolutions, SubmissionDefaults, process_report};

use crate::logging::redact_value;
use crate::types::{ImportResult, ReportSummary};

/// Lookup inputs of a run.
#[derive(Debug, Clone)]
pub struct PanelInputs {
    pub manifest: PathBuf,
    pub panel_dump: PathBuf,
    pub manual_overrides: PathBuf,
    /// Pre-generated mapping; generated from the panel dump when absent.
    pub mapping: Option<PathBuf>,
}

/// Loaded lookup tables.
#[derive(Debug)]
pub struct PanelTables {
    pub manifest: Manifest,
    pub resolver: PanelResolver,
    pub overlaps: Vec<Overlap>,
    /// Condition names curated for panels without a code.
    pub curated_conditions: BTreeMap<String, String>,
}

impl PanelTables {
    pub fn load(inputs: &PanelInputs) -> Result<Self> {
        let _span = info_span!("load_tables").entered();
        let manifest = read_manifest(&inputs.manifest)
            .with_context(|| format!("load manifest {}", inputs.manifest.display()))?;
        let mapping = match &inputs.mapping {
            Some(path) => read_mapping_table(path)
                .with_context(|| format!("load mapping {}", path.display()))?,
            None => mapping_from_dump(&inputs.panel_dump, &manifest)?,
        };
        let manual = read_manual_overrides(&inputs.manual_overrides).with_context(|| {
            format!(
                "load manual overrides {}",
                inputs.manual_overrides.display()
            )
        })?;

        let overlaps = check_overlaps(&mapping, &manual.codes);
        for overlap in &overlaps {
            if overlap.is_conflict() {
                warn!(
                    panel_id = %overlap.panel_id,
                    mapped = %overlap.mapped_code,
                    manual = %overlap.manual_code,
                    "manual override disagrees with generated mapping; mapping wins"
                );
            } else {
                debug!(panel_id = %overlap.panel_id, "manual override duplicates mapping");
            }
        }
        info!(
            samples = manifest.len(),
            mapped = mapping.len(),
            manual = manual.codes.len(),
            "lookup tables loaded"
        );
        Ok(Self {
            manifest,
            resolver: PanelResolver::new(mapping, manual.codes),
            overlaps,
            curated_conditions: manual.conditions,
        })
    }
}

/// Generate the mapping for every manifest selection from the panel dump.
pub fn mapping_from_dump(panel_dump: &Path, manifest: &Manifest) -> Result<CodeTable> {
    let panels = read_panel_dump(panel_dump)
        .with_context(|| format!("load panel dump {}", panel_dump.display()))?;
    generate_mapping(
        &panels,
        manifest.samples().map(|sample| sample.panels.as_slice()),
    )
    .context("generate panel mapping")
}

/// Inputs of an import run.
#[derive(Debug, Clone)]
pub struct ImportInputs {
    /// Report files or directories of reports.
    pub reports: Vec<PathBuf>,
    pub field_map: PathBuf,
    pub panels: PanelInputs,
}

/// Parse every report into import-ready records.
///
/// Report-level and variant-level problems are collected in
/// [`ImportResult::errors`]; only unreadable lookup inputs abort the run.
pub fn run_import(inputs: &ImportInputs, progress: &ProgressBar) -> Result<ImportResult> {
    let tables = PanelTables::load(&inputs.panels)?;
    let field_map = read_field_map(&inputs.field_map)
        .with_context(|| format!("load field map {}", inputs.field_map.display()))?;
    let resolutions = SampleResolutions::build(&tables.manifest, &tables.resolver)
        .with_curated_conditions(&tables.curated_conditions);
    let defaults = SubmissionDefaults::default();
    let context = RecordContext {
        field_map: &field_map,
        resolutions: &resolutions,
        defaults: &defaults,
    };

    let paths = expand_report_paths(&inputs.reports).context("discover reports")?;
    progress.set_length(paths.len() as u64);

    let mut result = ImportResult {
        records: Vec::new(),
        reports: Vec::new(),
        skipped: Vec::new(),
        overlaps: tables.overlaps,
        unresolved_panels: BTreeSet::new(),
        missing_samples: BTreeSet::new(),
        errors: Vec::new(),
        panel_errors: resolutions.errors().to_vec(),
        dump: None,
        inserted: None,
        has_errors: false,
    };
    for (sample, error) in &result.panel_errors {
        warn!(sample = %redact_value(sample), error = %error, "manifest sample without panels");
    }

    for path in &paths {
        let name = display_name(path);
        progress.set_message(name.clone());
        let _span = info_span!("report", report = %redact_value(&name)).entered();
        match read_report(path) {
            Ok(ReportOutcome::Parsed(report)) => {
                let output = process_report(&report, &context);
                let source = report
                    .sample_number
                    .as_deref()
                    .and_then(|sample| resolutions.get(sample))
                    .and_then(|sample| sample.resolution.as_ref());
                if let Some(sample) = &report.sample_number {
                    match source {
                        Some(resolution) if resolution.source == ResolutionSource::Unresolved => {
                            result.unresolved_panels.insert(resolution.panel_id.clone());
                        }
                        None if resolutions.get(sample).is_none() => {
                            result.missing_samples.insert(sample.clone());
                        }
                        _ => {}
                    }
                }
                for issue in &output.issues {
                    let position = issue
                        .variant_index
                        .map(|index| format!(" variant {}", index + 1))
                        .unwrap_or_default();
                    result
                        .errors
                        .push(format!("{}{position}: {}", issue.evaluation, issue.error));
                }
                result.reports.push(ReportSummary {
                    name,
                    sample_number: report.sample_number.clone(),
                    source: source.map(|resolution| resolution.source),
                    evaluations: output.evaluations,
                    records: output.records.len(),
                    issues: output.issues.len(),
                });
                result.records.extend(output.records);
            }
            Ok(ReportOutcome::NoData { path }) => {
                warn!("report has no evaluation data; skipped");
                result.skipped.push(path);
            }
            Err(error) => {
                warn!(error = %error, "report could not be read");
                result.errors.push(error.to_string());
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    fill_missing_keys(&mut result.records);
    result.has_errors = !result.errors.is_empty();
    info!(
        reports = result.reports.len(),
        skipped = result.skipped.len(),
        records = result.records.len(),
        errors = result.errors.len(),
        "reports converted"
    );
    Ok(result)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
