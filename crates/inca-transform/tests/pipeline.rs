//! Integration tests for report conversion.

use std::collections::BTreeMap;
use std::path::Path;

use inca_ingest::{FieldMap, Manifest, ReportOutcome, SampleEntry, parse_report};
use inca_map::{CodeTable, PanelResolver};
use inca_model::ResolutionSource;
use inca_transform::{
    RecordContext, SAMPLE_NOT_IN_MANIFEST, SampleResolutions, SubmissionDefaults,
    TransformError, process_report,
};
use serde_json::{Value, json};

fn manifest() -> Manifest {
    Manifest::from_entries([
        SampleEntry {
            sample_number: "GM23.0001".to_string(),
            panels: vec!["_Ataxia".to_string()],
        },
        SampleEntry {
            sample_number: "GM23.0002".to_string(),
            panels: vec!["Dementia_".to_string()],
        },
        SampleEntry {
            sample_number: "GM23.0003".to_string(),
            panels: vec!["Rare thing".to_string()],
        },
        SampleEntry {
            sample_number: "GM23.0004".to_string(),
            panels: vec![],
        },
    ])
}

fn resolver() -> PanelResolver {
    let mut mapping = CodeTable::new();
    mapping
        .insert("Ataxia", "R54", Some("Hereditary ataxia".to_string()))
        .unwrap();
    let mut manual = CodeTable::new();
    manual
        .insert("Dementia_", "R59", Some("Early onset dementia".to_string()))
        .unwrap();
    PanelResolver::new(mapping, manual)
}

fn field_map() -> FieldMap {
    FieldMap::from_value(&json!({
        ".gene": "gene_symbol",
        "refalt": {".refAlt": ["ref", "alt"]}
    }))
    .unwrap()
}

fn report(file: &str, evaluations: Value) -> inca_ingest::Report {
    let doc = json!([{}, {}, {"data": {"evaluations": evaluations}}]);
    match parse_report(Path::new(file), doc).unwrap() {
        ReportOutcome::Parsed(report) => report,
        ReportOutcome::NoData { .. } => panic!("fixture has data"),
    }
}

#[test]
fn sample_resolutions_cover_every_source() {
    let resolutions = SampleResolutions::build(&manifest(), &resolver());
    assert_eq!(resolutions.len(), 4);

    let source = |sample: &str| {
        resolutions
            .get(sample)
            .and_then(|s| s.resolution.as_ref())
            .map(|r| r.source)
    };
    assert_eq!(source("GM23.0001"), Some(ResolutionSource::Mapped));
    assert_eq!(source("GM23.0002"), Some(ResolutionSource::Manual));
    assert_eq!(source("GM23.0003"), Some(ResolutionSource::Unresolved));
    assert_eq!(source("GM23.0004"), None);
    assert_eq!(resolutions.errors().len(), 1);
    assert_eq!(resolutions.errors()[0].0, "GM23.0004");
}

#[test]
fn curated_condition_fills_unresolved_samples_only() {
    let conditions = BTreeMap::from([
        ("Rare thing".to_string(), "Rare condition".to_string()),
        ("Ataxia".to_string(), "Ignored".to_string()),
    ]);
    let resolutions =
        SampleResolutions::build(&manifest(), &resolver()).with_curated_conditions(&conditions);

    let unresolved = resolutions
        .get("GM23.0003")
        .and_then(|s| s.resolution.as_ref())
        .unwrap();
    assert_eq!(unresolved.source, ResolutionSource::Unresolved);
    assert_eq!(unresolved.code, None);
    assert_eq!(unresolved.condition.as_deref(), Some("Rare condition"));

    let mapped = resolutions
        .get("GM23.0001")
        .and_then(|s| s.resolution.as_ref())
        .unwrap();
    assert_eq!(mapped.condition.as_deref(), Some("Hereditary ataxia"));
}

#[test]
fn converts_variants_with_panel_and_constants() {
    let resolutions = SampleResolutions::build(&manifest(), &resolver());
    let field_map = field_map();
    let defaults = SubmissionDefaults::default();
    let context = RecordContext {
        field_map: &field_map,
        resolutions: &resolutions,
        defaults: &defaults,
    };
    let report = report(
        "GM23_0001_final.json",
        json!([
            {"variants": [{"gene": "SCA1", "refAlt": "C/T"}, {"gene": "ATXN2", "refAlt": "G/A"}]},
            null,
            {"variants": [{"gene": "FXN", "refAlt": "A/G"}]}
        ]),
    );

    let output = process_report(&report, &context);
    assert_eq!(output.evaluations, 2);
    assert!(output.issues.is_empty());
    assert_eq!(output.records.len(), 3);

    let first = &output.records[0];
    assert_eq!(first.get_str("gene_symbol"), Some("SCA1"));
    assert_eq!(first.get_str("r_code"), Some("R54"));
    assert_eq!(
        first.get_str("preferred_condition_name"),
        Some("Hereditary ataxia")
    );
    assert_eq!(first.get_str("panel"), Some("Ataxia"));
    assert_eq!(first.get("organisation_id"), Some(&json!(288359)));
    assert_eq!(first.get_str("probeset_id"), Some("Medicover TWE"));
    assert_eq!(first.get_str("report_evaluation"), Some("GM23_0001_final-1"));
    assert_eq!(first.get("local_id"), first.get("linking_id"));
    assert!(first.get_str("local_id").unwrap().starts_with("uid_"));
    assert_ne!(first.get("local_id"), output.records[1].get("local_id"));

    assert_eq!(
        output.records[2].get_str("report_evaluation"),
        Some("GM23_0001_final-3")
    );
}

#[test]
fn unresolved_and_unknown_samples_are_kept() {
    let resolutions = SampleResolutions::build(&manifest(), &resolver());
    let field_map = field_map();
    let defaults = SubmissionDefaults::default();
    let context = RecordContext {
        field_map: &field_map,
        resolutions: &resolutions,
        defaults: &defaults,
    };

    let unresolved = report(
        "GM23_0003.json",
        json!([{"variants": [{"gene": "X", "refAlt": "C/T"}]}]),
    );
    let output = process_report(&unresolved, &context);
    let record = &output.records[0];
    assert!(!record.contains("r_code"));
    assert_eq!(record.get_str("panel"), Some("Rare thing"));

    let unknown = report(
        "GM99_0001.json",
        json!([{"variants": [{"gene": "X", "refAlt": "C/T"}]}]),
    );
    let output = process_report(&unknown, &context);
    assert_eq!(
        output.records[0].get_str("panel"),
        Some(SAMPLE_NOT_IN_MANIFEST)
    );
}

#[test]
fn bad_variants_become_issues() {
    let resolutions = SampleResolutions::default();
    let field_map = field_map();
    let defaults = SubmissionDefaults::default();
    let context = RecordContext {
        field_map: &field_map,
        resolutions: &resolutions,
        defaults: &defaults,
    };
    let report = report(
        "no_sample.json",
        json!([
            {"variants": [{"gene": "X", "refAlt": "CT"}, {"gene": "Y", "refAlt": "C/T"}]},
            {"notes": "no variants here"}
        ]),
    );
    let output = process_report(&report, &context);
    assert_eq!(output.records.len(), 1);
    assert!(!output.records[0].contains("panel"));
    assert_eq!(output.issues.len(), 2);
    assert_eq!(output.issues[0].variant_index, Some(0));
    assert_eq!(
        output.issues[0].error,
        TransformError::RefAlt {
            value: "CT".to_string()
        }
    );
    assert_eq!(output.issues[1].error, TransformError::MissingVariants);
    assert_eq!(output.issues[1].evaluation, "no_sample-2");
}
