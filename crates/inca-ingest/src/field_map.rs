//! Field map: how report values become INCA columns.
//!
//! The file is a JSON object. Most entries map a query to a column name;
//! a few reserved keys need dedicated handling:
//!
//! ```json
//! {
//!   ".variant.chromosome": "chromosome",
//!   "hgvsc": [".transcript", ".cDNA"],
//!   "refalt": {".variant.refAlt": ["ref", "alt"]},
//!   "date_last_evaluated": ".lastEvaluated",
//!   "code": ".acmgScoring.criteria[]",
//!   "reported": ".status"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{IngestError, Result};
use crate::query::JsonQuery;

/// One entry of the field map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Plain query whose matches fill `column`.
    Column { query: JsonQuery, column: String },
    /// First match of each query, joined with `:`.
    Hgvsc { queries: Vec<JsonQuery> },
    /// A `REF/ALT` value split into two columns.
    RefAlt {
        query: JsonQuery,
        ref_column: String,
        alt_column: String,
    },
    /// Evaluation date, queried on the evaluation rather than the variant.
    DateLastEvaluated { query: JsonQuery },
    /// ACGS criteria arrays of alternating code and strength.
    AcgsCriteria { query: JsonQuery },
    /// Reporting status mapped to `yes`/`no`.
    Reported { query: JsonQuery },
}

impl FieldRule {
    /// Columns this rule writes.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Column { column, .. } => vec![column.as_str()],
            Self::Hgvsc { .. } => vec!["hgvsc"],
            Self::RefAlt {
                ref_column,
                alt_column,
                ..
            } => vec![ref_column.as_str(), alt_column.as_str()],
            Self::DateLastEvaluated { .. } => vec!["date_last_evaluated"],
            Self::AcgsCriteria { .. } => Vec::new(),
            Self::Reported { .. } => vec!["reported"],
        }
    }
}

/// Ordered list of rules, applied in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    rules: Vec<FieldRule>,
}

impl FieldMap {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(IngestError::FieldMap {
                key: "<root>".to_string(),
                reason: "field map must be a JSON object".to_string(),
            });
        };
        let rules = entries
            .iter()
            .map(|(key, value)| parse_rule(key, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }
}

fn parse_rule(key: &str, value: &Value) -> Result<FieldRule> {
    let fail = |reason: &str| IngestError::FieldMap {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    match key {
        "hgvsc" => {
            let items = value
                .as_array()
                .ok_or_else(|| fail("expected an array of queries"))?;
            let queries = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| fail("queries must be strings"))
                        .and_then(JsonQuery::parse)
                })
                .collect::<Result<Vec<_>>>()?;
            if queries.is_empty() {
                return Err(fail("at least one query is required"));
            }
            Ok(FieldRule::Hgvsc { queries })
        }
        "refalt" => parse_refalt(value.as_object().ok_or_else(|| {
            fail("expected an object of query to [ref_column, alt_column]")
        })?)
        .map_err(|reason| fail(&reason))?,
        "date_last_evaluated" => Ok(FieldRule::DateLastEvaluated {
            query: string_query(value).ok_or_else(|| fail("expected a query string"))??,
        }),
        "code" => Ok(FieldRule::AcgsCriteria {
            query: string_query(value).ok_or_else(|| fail("expected a query string"))??,
        }),
        "reported" => Ok(FieldRule::Reported {
            query: string_query(value).ok_or_else(|| fail("expected a query string"))??,
        }),
        _ => {
            let column = value
                .as_str()
                .filter(|column| !column.trim().is_empty())
                .ok_or_else(|| fail("expected a column name"))?;
            Ok(FieldRule::Column {
                query: JsonQuery::parse(key)?,
                column: column.trim().to_string(),
            })
        }
    }
}

fn string_query(value: &Value) -> Option<Result<JsonQuery>> {
    value.as_str().map(JsonQuery::parse)
}

fn parse_refalt(entries: &Map<String, Value>) -> std::result::Result<Result<FieldRule>, String> {
    let mut iter = entries.iter();
    let (Some((query, columns)), None) = (iter.next(), iter.next()) else {
        return Err("expected exactly one query".to_string());
    };
    let columns: Vec<&str> = columns
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let [ref_column, alt_column] = columns.as_slice() else {
        return Err("expected two column names".to_string());
    };
    Ok(JsonQuery::parse(query).map(|query| FieldRule::RefAlt {
        query,
        ref_column: (*ref_column).to_string(),
        alt_column: (*alt_column).to_string(),
    }))
}

/// Read and validate a field map file.
pub fn read_field_map(path: &Path) -> Result<FieldMap> {
    let contents = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    FieldMap::from_value(&value)
}
