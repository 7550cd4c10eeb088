//! Report to record conversion.

use inca_ingest::{FieldMap, Report};
use inca_model::ImportRecord;
use serde_json::Value;
use tracing::{debug, warn};

use crate::enrich::{SampleResolutions, SubmissionDefaults, attach_panel, new_local_id};
use crate::error::TransformError;
use crate::extract::extract_variant;

/// Shared inputs of a run.
#[derive(Debug, Clone)]
pub struct RecordContext<'a> {
    pub field_map: &'a FieldMap,
    pub resolutions: &'a SampleResolutions,
    pub defaults: &'a SubmissionDefaults,
}

/// A variant that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// Evaluation label, `<report stem>-<n>`.
    pub evaluation: String,
    /// Zero-based position of the variant in its evaluation.
    pub variant_index: Option<usize>,
    pub error: TransformError,
}

/// Records and issues of one report.
#[derive(Debug, Clone, Default)]
pub struct ReportRecords {
    pub records: Vec<ImportRecord>,
    pub issues: Vec<RecordIssue>,
    pub evaluations: usize,
}

/// Convert every variant of every evaluation in `report`.
pub fn process_report(report: &Report, context: &RecordContext<'_>) -> ReportRecords {
    let mut output = ReportRecords::default();
    for (index, evaluation) in report.evaluations.iter().enumerate() {
        let Some(evaluation) = evaluation else {
            continue;
        };
        output.evaluations += 1;
        let label = report.evaluation_label(index);
        let Some(variants) = evaluation.get("variants").and_then(Value::as_array) else {
            warn!(evaluation = index + 1, "evaluation has no variants array");
            output.issues.push(RecordIssue {
                evaluation: label,
                variant_index: None,
                error: TransformError::MissingVariants,
            });
            continue;
        };
        for (variant_index, variant) in variants.iter().enumerate() {
            match build_record(report, &label, variant, evaluation, context) {
                Ok(record) => output.records.push(record),
                Err(error) => {
                    warn!(evaluation = index + 1, variant_index, error = %error, "variant skipped");
                    output.issues.push(RecordIssue {
                        evaluation: label.clone(),
                        variant_index: Some(variant_index),
                        error,
                    });
                }
            }
        }
    }
    debug!(
        evaluations = output.evaluations,
        records = output.records.len(),
        issues = output.issues.len(),
        "report converted"
    );
    output
}

fn build_record(
    report: &Report,
    label: &str,
    variant: &Value,
    evaluation: &Value,
    context: &RecordContext<'_>,
) -> Result<ImportRecord, TransformError> {
    let mut record = extract_variant(context.field_map, variant, evaluation)?;
    attach_panel(
        &mut record,
        report.sample_number.as_deref(),
        context.resolutions,
    );
    let local_id = new_local_id();
    record.set("local_id", local_id.as_str());
    record.set("linking_id", local_id);
    context.defaults.apply(&mut record);
    record.set("report_evaluation", label);
    Ok(record)
}
