//! Value normalisation for INCA columns.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Result, TransformError};

/// ACGS criteria accepted as columns.
pub const ACGS_CODES: [&str; 26] = [
    "PVS1", "PS1", "PS2", "PS3", "PS4", "PM1", "PM2", "PM3", "PM4", "PM5", "PM6", "PP1", "PP2",
    "PP3", "PP4", "BA1", "BS1", "BS2", "BS3", "BS4", "BP1", "BP2", "BP3", "BP4", "BP5", "BP7",
];

pub const GENE_SYMBOL_COLUMN: &str = "gene_symbol";

const PROVIDER_GENOME: &str = "GRCh_37_g1k,Chromosome,Homo sapiens";
const REFERENCE_GENOME: &str = "GRCh37.p13";

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text form of a JSON value. Strings are unquoted; null has no text.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(if *flag { "True" } else { "False" }.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

/// Join query matches into one column value.
///
/// Returns `None` when every match is null.
pub fn join_matches(values: &[&Value]) -> Option<String> {
    let texts: Vec<String> = values.iter().filter_map(|value| value_text(value)).collect();
    if texts.is_empty() {
        return None;
    }
    Some(
        texts
            .iter()
            .map(|text| text.replace(", which is", ""))
            .collect::<Vec<_>>()
            .join(" | "),
    )
}

/// Final formatting of a plain column value.
pub fn format_column_value(column: &str, joined: &str) -> String {
    if joined == PROVIDER_GENOME {
        return REFERENCE_GENOME.to_string();
    }
    if column == GENE_SYMBOL_COLUMN {
        return joined.replace('_', " ");
    }
    capitalize(joined).replace('_', " ")
}

/// `VERY_STRONG` -> `Very strong`, `STANDALONE` -> `Stand-Alone`.
pub fn format_strength(raw: &str) -> String {
    let strength = capitalize(raw).replace('_', " ");
    if strength == "Standalone" {
        "Stand-Alone".to_string()
    } else {
        strength
    }
}

/// Column name for a criterion such as `PM2_SUPPORTING`, if it is an ACGS code.
pub fn acgs_column(raw_code: &str) -> Option<String> {
    let code = raw_code.split('_').next().unwrap_or_default();
    let upper = code.to_uppercase();
    ACGS_CODES
        .contains(&upper.as_str())
        .then(|| upper.to_lowercase())
}

/// Pairs of `(code, strength)` from a flat criteria array.
pub fn criteria_pairs(criteria: &[Value]) -> Vec<(&str, &str)> {
    criteria
        .chunks(2)
        .filter_map(|pair| match pair {
            [Value::String(code), Value::String(strength)] => {
                Some((code.as_str(), strength.as_str()))
            }
            _ => None,
        })
        .collect()
}

/// Reporting status flag.
pub fn reported_flag(status: &Value) -> &'static str {
    if status.as_str() == Some("REPORTING") {
        "yes"
    } else {
        "no"
    }
}

/// `MM/DD/YYYY` -> `YYYY-MM-DD`.
pub fn convert_date(raw: &str) -> Result<String> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| TransformError::InvalidDate {
            value: raw.to_string(),
        })
}

/// Split `REF/ALT` into its two alleles.
pub fn split_ref_alt(raw: &str) -> Result<(String, String)> {
    let mut parts = raw.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(reference), Some(alternate), None) => {
            Ok((reference.to_string(), alternate.to_string()))
        }
        _ => Err(TransformError::RefAlt {
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn capitalizes_like_sentence_case() {
        assert_eq!(capitalize("PATHOGENIC"), "Pathogenic");
        assert_eq!(capitalize("likely_BENIGN"), "Likely_benign");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn column_values() {
        assert_eq!(
            format_column_value("ref_genome", "GRCh_37_g1k,Chromosome,Homo sapiens"),
            "GRCh37.p13"
        );
        assert_eq!(format_column_value("gene_symbol", "HLA_DRB1"), "HLA DRB1");
        assert_eq!(
            format_column_value("germline_classification", "LIKELY_PATHOGENIC"),
            "Likely pathogenic"
        );
    }

    #[test]
    fn joins_matches_and_drops_nulls() {
        let a = json!("Missense, which is predicted damaging");
        let b = json!(3);
        let null = Value::Null;
        assert_eq!(
            join_matches(&[&a, &null, &b]).as_deref(),
            Some("Missense predicted damaging | 3")
        );
        assert_eq!(join_matches(&[&null]), None);
        assert_eq!(join_matches(&[]), None);
    }

    #[test]
    fn strengths() {
        assert_eq!(format_strength("VERY_STRONG"), "Very strong");
        assert_eq!(format_strength("SUPPORTING"), "Supporting");
        assert_eq!(format_strength("STANDALONE"), "Stand-Alone");
    }

    #[test]
    fn acgs_columns() {
        assert_eq!(acgs_column("PM2_SUPPORTING").as_deref(), Some("pm2"));
        assert_eq!(acgs_column("pvs1").as_deref(), Some("pvs1"));
        assert_eq!(acgs_column("BP6"), None);
    }

    #[test]
    fn criteria_pairs_skip_trailing_and_non_strings() {
        let criteria = vec![
            json!("PM2"),
            json!("MODERATE"),
            json!("PP3"),
            json!(1),
            json!("BP4"),
        ];
        assert_eq!(criteria_pairs(&criteria), vec![("PM2", "MODERATE")]);
    }

    #[test]
    fn dates_and_alleles() {
        assert_eq!(convert_date("03/07/2023").unwrap(), "2023-03-07");
        assert!(convert_date("2023-03-07").is_err());
        assert_eq!(
            split_ref_alt("C/T").unwrap(),
            ("C".to_string(), "T".to_string())
        );
        assert!(split_ref_alt("CT").is_err());
        assert!(split_ref_alt("C/T/G").is_err());
    }

    #[test]
    fn reported() {
        assert_eq!(reported_flag(&json!("REPORTING")), "yes");
        assert_eq!(reported_flag(&json!("NOT_REPORTING")), "no");
        assert_eq!(reported_flag(&Value::Null), "no");
    }
}
