//! Property tests for panel resolution precedence.

use std::collections::BTreeMap;

use inca_map::{CodeTable, MappingError, PanelResolver, resolve};
use inca_model::{ResolutionResult, ResolutionSource};
use proptest::prelude::*;

fn table(entries: &BTreeMap<String, String>) -> CodeTable {
    CodeTable::from_pairs(entries.clone()).expect("unique keys never conflict")
}

fn panel_id() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,11}"
}

fn code() -> impl Strategy<Value = String> {
    "R[0-9]{1,3}"
}

fn code_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(panel_id(), code(), 0..12)
}

proptest! {
    #[test]
    fn mapped_ids_always_come_from_mapping(
        mapping in code_map(),
        manual in code_map(),
    ) {
        let mapping_table = table(&mapping);
        let manual_table = table(&manual);
        for (id, expected) in &mapping {
            let result = resolve(id, &mapping_table, &manual_table).unwrap();
            prop_assert_eq!(result.source, ResolutionSource::Mapped);
            prop_assert_eq!(result.code.as_deref(), Some(expected.as_str()));
        }
    }

    #[test]
    fn manual_fills_gaps_only(
        mapping in code_map(),
        manual in code_map(),
    ) {
        let mapping_table = table(&mapping);
        let manual_table = table(&manual);
        for (id, expected) in manual.iter().filter(|(id, _)| !mapping.contains_key(*id)) {
            let result = resolve(id, &mapping_table, &manual_table).unwrap();
            prop_assert_eq!(result.source, ResolutionSource::Manual);
            prop_assert_eq!(result.code.as_deref(), Some(expected.as_str()));
        }
    }

    #[test]
    fn unknown_ids_are_unresolved(
        mapping in code_map(),
        manual in code_map(),
        id in panel_id(),
    ) {
        prop_assume!(!mapping.contains_key(&id) && !manual.contains_key(&id));
        let result = resolve(&id, &table(&mapping), &table(&manual)).unwrap();
        prop_assert_eq!(result, ResolutionResult::unresolved(id));
    }

    #[test]
    fn resolution_is_idempotent(
        mapping in code_map(),
        manual in code_map(),
        id in panel_id(),
    ) {
        let mapping_table = table(&mapping);
        let manual_table = table(&manual);
        let first = resolve(&id, &mapping_table, &manual_table);
        let second = resolve(&id, &mapping_table, &manual_table);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn documented_example() {
    let mapping = CodeTable::from_pairs([("PanelA", "R123")]).unwrap();
    let manual = CodeTable::from_pairs([("PanelB", "R999")]).unwrap();

    let a = resolve("PanelA", &mapping, &manual).unwrap();
    assert_eq!(
        (a.panel_id.as_str(), a.code.as_deref(), a.source),
        ("PanelA", Some("R123"), ResolutionSource::Mapped)
    );
    let b = resolve("PanelB", &mapping, &manual).unwrap();
    assert_eq!(
        (b.panel_id.as_str(), b.code.as_deref(), b.source),
        ("PanelB", Some("R999"), ResolutionSource::Manual)
    );
    let c = resolve("PanelC", &mapping, &manual).unwrap();
    assert_eq!(
        (c.panel_id.as_str(), c.code.as_deref(), c.source),
        ("PanelC", None, ResolutionSource::Unresolved)
    );
    assert_eq!(resolve("", &mapping, &manual), Err(MappingError::InvalidInput));
}

#[test]
fn resolver_exposes_tables() {
    let resolver = PanelResolver::new(
        CodeTable::from_pairs([("PanelA", "R123")]).unwrap(),
        CodeTable::new(),
    );
    assert_eq!(resolver.mapping().len(), 1);
    assert!(resolver.manual_overrides().is_empty());
    assert_eq!(
        resolver.resolve("PanelA").unwrap().source,
        ResolutionSource::Mapped
    );
}
