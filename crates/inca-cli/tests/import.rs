//! Integration tests for the import pipeline.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use indicatif::ProgressBar;
use inca_cli::import::{ImportInputs, PanelInputs, PanelTables, run_import};
use inca_map::MappingError;
use inca_model::ResolutionSource;
use insta::assert_json_snapshot;
use serde_json::Value;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

fn report_json(variants: &str) -> String {
    format!(r#"[{{}}, {{}}, {{"data": {{"evaluations": [{{"variants": {variants}}}]}}}}]"#)
}

fn fixture() -> (TempDir, ImportInputs) {
    let dir = TempDir::new().unwrap();
    let manifest = write(
        &dir,
        "manifest.csv",
        "CUH sample number,Panels\n\
         GM23.0001,Hereditary ataxia\n\
         GM23.0002,Mystery panel\n\
         GM23.0003,Dementia_\n",
    );
    let panel_dump = write(
        &dir,
        "panels.tsv",
        "402\tHereditary ataxia\t['R54', 'Ataxia']\n\
         111\tResearch only\t[]\n",
    );
    let manual_overrides = write(
        &dir,
        "rescued.tsv",
        "raw_panel\tnew_panel\tr_code\n\
         Dementia_\tEarly onset dementia\t59\n",
    );
    let field_map = write(
        &dir,
        "field_map.json",
        r#"{".gene": "gene_symbol", "refalt": {".refAlt": ["ref", "alt"]}}"#,
    );
    write(
        &dir,
        "reports/GM23_0001.json",
        &report_json(r#"[{"gene": "SCA1", "refAlt": "C/T"}]"#),
    );
    write(
        &dir,
        "reports/GM23_0002.json",
        &report_json(r#"[{"gene": "TTN", "refAlt": "G/A"}]"#),
    );
    write(
        &dir,
        "reports/GM99_0001.json",
        &report_json(r#"[{"gene": "FXN", "refAlt": "A/G"}]"#),
    );
    write(&dir, "reports/empty.json", "[]");
    write(&dir, "reports/broken.json", "{not json");

    let inputs = ImportInputs {
        reports: vec![dir.path().join("reports")],
        field_map,
        panels: PanelInputs {
            manifest,
            panel_dump,
            manual_overrides,
            mapping: None,
        },
    };
    (dir, inputs)
}

#[test]
fn tables_resolve_mapped_and_manual_panels() {
    let (_dir, inputs) = fixture();
    let tables = PanelTables::load(&inputs.panels).unwrap();
    assert!(tables.overlaps.is_empty());

    let mapped = tables.resolver.resolve("Hereditary ataxia").unwrap();
    assert_eq!(mapped.source, ResolutionSource::Mapped);
    assert_eq!(mapped.code.as_deref(), Some("R54"));

    let manual = tables.resolver.resolve("Dementia_").unwrap();
    assert_eq!(manual.source, ResolutionSource::Manual);
    assert_eq!(manual.code.as_deref(), Some("R59"));

    let unresolved = tables.resolver.resolve("Mystery panel").unwrap();
    assert_eq!(unresolved.source, ResolutionSource::Unresolved);
}

#[test]
fn import_collects_records_and_problems() {
    let (_dir, inputs) = fixture();
    let result = run_import(&inputs, &ProgressBar::hidden()).unwrap();

    assert_eq!(result.reports.len(), 3);
    assert_eq!(result.records.len(), 3);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("broken.json"));
    assert!(result.has_errors);
    assert!(result.unresolved_panels.contains("Mystery panel"));
    assert!(result.missing_samples.contains("GM99.0001"));

    assert_eq!(result.reports[0].source, Some(ResolutionSource::Mapped));
    assert_eq!(result.reports[1].source, Some(ResolutionSource::Unresolved));
    assert_eq!(result.reports[2].source, None);

    // Every record carries the same columns after the import.
    let columns: Vec<Vec<&str>> = result
        .records
        .iter()
        .map(|record| record.columns().collect())
        .collect();
    assert!(columns.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(result.records[1].get("r_code"), Some(&Value::Null));
}

#[test]
fn sample_without_panels_is_listed_and_curated_condition_kept() {
    let (dir, inputs) = fixture();
    write(
        &dir,
        "manifest.csv",
        "CUH sample number,Panels\n\
         GM23.0001,Hereditary ataxia\n\
         GM23.0002,Mystery panel\n\
         GM23.0005,_\n",
    );
    write(
        &dir,
        "rescued.tsv",
        "raw_panel\tnew_panel\tr_code\n\
         Mystery panel\tCurated mystery\t\n",
    );
    write(
        &dir,
        "reports/GM23_0005.json",
        &report_json(r#"[{"gene": "BRCA2", "refAlt": "T/C"}]"#),
    );
    let result = run_import(&inputs, &ProgressBar::hidden()).unwrap();

    assert_eq!(
        result.panel_errors,
        vec![("GM23.0005".to_string(), MappingError::InvalidInput)]
    );
    let by_evaluation = |evaluation: &str| {
        result
            .records
            .iter()
            .find(|record| record.get_str("report_evaluation") == Some(evaluation))
            .unwrap()
    };
    let rejected = by_evaluation("GM23_0005-1");
    assert_eq!(rejected.get_str("panel"), Some(""));
    assert_eq!(rejected.get("r_code"), Some(&Value::Null));

    let curated = by_evaluation("GM23_0002-1");
    assert_eq!(
        curated.get_str("preferred_condition_name"),
        Some("Curated mystery")
    );
    assert_eq!(curated.get("r_code"), Some(&Value::Null));
    assert!(result.unresolved_panels.contains("Mystery panel"));
}

#[test]
fn mapped_record_contents() {
    let (_dir, inputs) = fixture();
    let result = run_import(&inputs, &ProgressBar::hidden()).unwrap();

    let record = &result.records[0];
    assert!(record.get_str("local_id").unwrap().starts_with("uid_"));
    let stable: BTreeMap<&str, &Value> = record
        .iter()
        .filter(|(column, _)| !matches!(*column, "local_id" | "linking_id"))
        .collect();
    assert_json_snapshot!(stable, @r###"
    {
      "affected_status": "yes",
      "allele_origin": "germline",
      "alt": "T",
      "collection_method": "clinical testing",
      "gene_symbol": "SCA1",
      "institution": "East Genomic Laboratory Hub, NHS Genomic Medicine Service",
      "interpreted": "yes",
      "organisation": "Cambridge Genomics Laboratory",
      "organisation_id": 288359,
      "panel": "Hereditary ataxia",
      "preferred_condition_name": "Hereditary ataxia",
      "probeset_id": "Medicover TWE",
      "r_code": "R54",
      "ref": "C",
      "report_evaluation": "GM23_0001-1"
    }
    "###);
}
