//! Field map application to a single variant.

use std::sync::LazyLock;

use inca_ingest::{FieldMap, FieldRule, JsonQuery};
use inca_model::ImportRecord;
use serde_json::Value;

use crate::error::Result;
use crate::normalize::{
    GENE_SYMBOL_COLUMN, acgs_column, convert_date, criteria_pairs, format_column_value,
    format_strength, join_matches, reported_flag, split_ref_alt, value_text,
};

static INTERPRETED_GENE: LazyLock<JsonQuery> = LazyLock::new(|| {
    JsonQuery::parse(".acmgScoring.interpretedGene").expect("valid interpreted gene query")
});

/// Build the report-derived columns of one variant.
///
/// `evaluation` is the enclosing evaluation, used by date rules.
pub fn extract_variant(
    field_map: &FieldMap,
    variant: &Value,
    evaluation: &Value,
) -> Result<ImportRecord> {
    let mut record = ImportRecord::new();
    for rule in field_map.rules() {
        apply_rule(rule, variant, evaluation, &mut record)?;
    }
    Ok(record)
}

fn apply_rule(
    rule: &FieldRule,
    variant: &Value,
    evaluation: &Value,
    record: &mut ImportRecord,
) -> Result<()> {
    match rule {
        FieldRule::Column { query, column } => {
            let joined = join_matches(&query.all(variant));
            let value = match joined {
                Some(joined) => Some(format_column_value(column, &joined)),
                None if column == GENE_SYMBOL_COLUMN => {
                    let fallback: Vec<String> = INTERPRETED_GENE
                        .all(variant)
                        .into_iter()
                        .filter_map(value_text)
                        .collect();
                    (!fallback.is_empty()).then(|| fallback.join(" "))
                }
                None => None,
            };
            match value {
                Some(value) => record.set(column.as_str(), value),
                None => record.set_null(column.as_str()),
            }
        }
        FieldRule::Hgvsc { queries } => {
            let parts: Vec<String> = queries
                .iter()
                .filter_map(|query| query.first(variant).and_then(value_text))
                .filter(|part| !part.is_empty())
                .collect();
            if parts.is_empty() {
                record.set_null("hgvsc");
            } else {
                record.set("hgvsc", parts.join(":"));
            }
        }
        FieldRule::RefAlt {
            query,
            ref_column,
            alt_column,
        } => match query.first(variant).and_then(value_text) {
            Some(raw) => {
                let (reference, alternate) = split_ref_alt(&raw)?;
                record.set(ref_column.as_str(), reference);
                record.set(alt_column.as_str(), alternate);
            }
            None => {
                record.set_null(ref_column.as_str());
                record.set_null(alt_column.as_str());
            }
        },
        FieldRule::DateLastEvaluated { query } => {
            match query
                .first(evaluation)
                .and_then(value_text)
                .filter(|raw| !raw.is_empty())
            {
                Some(raw) => record.set("date_last_evaluated", convert_date(&raw)?),
                None => record.set_null("date_last_evaluated"),
            }
        }
        FieldRule::AcgsCriteria { query } => {
            for criteria in query.all(variant) {
                let Some(items) = criteria.as_array() else {
                    continue;
                };
                for (code, strength) in criteria_pairs(items) {
                    if let Some(column) = acgs_column(code) {
                        record.set(column, format_strength(strength));
                    }
                }
            }
        }
        FieldRule::Reported { query } => {
            if let [status] = query.all(variant).as_slice() {
                record.set("reported", reported_flag(status));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::TransformError;

    fn field_map() -> FieldMap {
        FieldMap::from_value(&json!({
            ".geneName": "gene_symbol",
            ".classification": "germline_classification",
            ".genome": "ref_genome",
            "hgvsc": [".transcript", ".cDNA"],
            "refalt": {".refAlt": ["ref", "alt"]},
            "date_last_evaluated": ".evaluatedOn",
            "code": ".acmgScoring.criteria",
            "reported": ".status"
        }))
        .unwrap()
    }

    #[test]
    fn extracts_all_rule_kinds() {
        let variant = json!({
            "geneName": "BRCA1",
            "classification": "LIKELY_PATHOGENIC",
            "genome": "GRCh_37_g1k,Chromosome,Homo sapiens",
            "transcript": "NM_007294.3",
            "cDNA": "c.68_69del",
            "refAlt": "AG/A",
            "acmgScoring": {"criteria": ["PM2_SUPPORTING", "SUPPORTING", "PVS1", "VERY_STRONG", "XX1", "STRONG"]},
            "status": "REPORTING"
        });
        let evaluation = json!({"evaluatedOn": "11/02/2022"});
        let record = extract_variant(&field_map(), &variant, &evaluation).unwrap();

        assert_eq!(record.get_str("gene_symbol"), Some("BRCA1"));
        assert_eq!(
            record.get_str("germline_classification"),
            Some("Likely pathogenic")
        );
        assert_eq!(record.get_str("ref_genome"), Some("GRCh37.p13"));
        assert_eq!(record.get_str("hgvsc"), Some("NM_007294.3:c.68_69del"));
        assert_eq!(record.get_str("ref"), Some("AG"));
        assert_eq!(record.get_str("alt"), Some("A"));
        assert_eq!(record.get_str("date_last_evaluated"), Some("2022-11-02"));
        assert_eq!(record.get_str("pm2"), Some("Supporting"));
        assert_eq!(record.get_str("pvs1"), Some("Very strong"));
        assert!(!record.contains("xx1"));
        assert_eq!(record.get_str("reported"), Some("yes"));
    }

    #[test]
    fn missing_values_become_null_and_gene_falls_back() {
        let variant = json!({"acmgScoring": {"interpretedGene": "TTN"}});
        let record = extract_variant(&field_map(), &variant, &json!({})).unwrap();
        assert_eq!(record.get_str("gene_symbol"), Some("TTN"));
        assert_eq!(record.get("germline_classification"), Some(&Value::Null));
        assert_eq!(record.get("hgvsc"), Some(&Value::Null));
        assert_eq!(record.get("ref"), Some(&Value::Null));
        assert_eq!(record.get("date_last_evaluated"), Some(&Value::Null));
        assert_eq!(record.get_str("reported"), Some("no"));
    }

    #[test]
    fn bad_allele_is_an_error() {
        let variant = json!({"refAlt": "AG"});
        let error = extract_variant(&field_map(), &variant, &json!({})).unwrap_err();
        assert_eq!(
            error,
            TransformError::RefAlt {
                value: "AG".to_string()
            }
        );
    }
}
