//! Column value comparison between two INCA databases.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use sqlx::PgPool;
use tracing::{debug, warn};

use crate::error::{DbError, Result};
use crate::ident::{TableRef, quote_identifier, validate_identifier};

/// Default comparison output file.
pub const DEFAULT_COMPARISON_FILE: &str = "db_comparison.tsv";

/// Text used for NULL values.
pub const NULL_TEXT: &str = "NULL";

/// Columns compared by default.
pub const DEFAULT_COMPARE_COLUMNS: [&str; 31] = [
    "germline_classification",
    "collection_method",
    "allele_origin",
    "consequence",
    "probeset_id",
    "ref_genome",
    "pvs1",
    "ps1",
    "ps2",
    "ps3",
    "ps4",
    "pm1",
    "pm2",
    "pm3",
    "pm4",
    "pm5",
    "pm6",
    "pp1",
    "pp2",
    "pp3",
    "pp4",
    "bs1",
    "bs2",
    "bs3",
    "bs4",
    "bp1",
    "bp2",
    "bp3",
    "bp4",
    "bp5",
    "bp7",
];

/// Distinct values per column.
pub type ColumnValues = BTreeMap<String, BTreeSet<String>>;

/// Value sets of one column across the two databases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnComparison {
    pub column: String,
    pub shared: BTreeSet<String>,
    pub dev_only: BTreeSet<String>,
    pub prod_only: BTreeSet<String>,
}

impl ColumnComparison {
    pub fn is_identical(&self) -> bool {
        self.dev_only.is_empty() && self.prod_only.is_empty()
    }
}

/// Distinct values of `column` in `table`, as text.
pub async fn fetch_distinct_values(
    pool: &PgPool,
    table: &TableRef,
    column: &str,
) -> Result<BTreeSet<String>> {
    validate_identifier(column)?;
    let sql = format!(
        "SELECT DISTINCT CAST({} AS TEXT) FROM {table}",
        quote_identifier(column)
    );
    let values: Vec<Option<String>> = sqlx::query_scalar(&sql)
        .fetch_all(pool)
        .await
        .map_err(|source| DbError::query(format!("reading {column} from {table}"), source))?;
    debug!(column, distinct = values.len(), "column values fetched");
    Ok(values
        .into_iter()
        .map(|value| value.unwrap_or_else(|| NULL_TEXT.to_string()))
        .collect())
}

/// Distinct values of each of `columns`.
pub async fn fetch_column_values(
    pool: &PgPool,
    table: &TableRef,
    columns: &[&str],
) -> Result<ColumnValues> {
    let mut values = ColumnValues::new();
    for column in columns {
        values.insert(
            (*column).to_string(),
            fetch_distinct_values(pool, table, column).await?,
        );
    }
    Ok(values)
}

/// Compare `columns` between the two value maps.
///
/// A column missing from one side counts as having no values there.
pub fn compare_columns(dev: &ColumnValues, prod: &ColumnValues, columns: &[&str]) -> Vec<ColumnComparison> {
    let empty = BTreeSet::new();
    columns
        .iter()
        .map(|column| {
            let dev_values = dev.get(*column).unwrap_or_else(|| {
                warn!(column, "column missing from dev values");
                &empty
            });
            let prod_values = prod.get(*column).unwrap_or_else(|| {
                warn!(column, "column missing from prod values");
                &empty
            });
            ColumnComparison {
                column: (*column).to_string(),
                shared: dev_values.intersection(prod_values).cloned().collect(),
                dev_only: dev_values.difference(prod_values).cloned().collect(),
                prod_only: prod_values.difference(dev_values).cloned().collect(),
            }
        })
        .collect()
}

/// Write comparisons as four TSV rows: column names, shared values, dev-only
/// values, prod-only values. Each cell joins its sorted values with `", "`.
pub fn write_comparison_tsv(path: &Path, comparisons: &[ColumnComparison]) -> Result<()> {
    let write_error = |error: csv::Error| DbError::FileWrite {
        path: path.to_path_buf(),
        source: error.into(),
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_path(path)
        .map_err(write_error)?;

    let join = |values: &BTreeSet<String>| values.iter().cloned().collect::<Vec<_>>().join(", ");
    let rows: [Vec<String>; 4] = [
        comparisons.iter().map(|c| c.column.clone()).collect(),
        comparisons.iter().map(|c| join(&c.shared)).collect(),
        comparisons.iter().map(|c| join(&c.dev_only)).collect(),
        comparisons.iter().map(|c| join(&c.prod_only)).collect(),
    ];
    for row in &rows {
        writer.write_record(row).map_err(write_error)?;
    }
    writer.flush().map_err(|source| DbError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &[&str])]) -> ColumnValues {
        pairs
            .iter()
            .map(|(column, values)| {
                (
                    column.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn compares_value_sets() {
        let dev = values(&[("pm2", &["Moderate", "Supporting"]), ("pvs1", &["Very strong"])]);
        let prod = values(&[("pm2", &["Supporting", "Strong"])]);

        let result = compare_columns(&dev, &prod, &["pm2", "pvs1"]);
        assert_eq!(result[0].shared, BTreeSet::from(["Supporting".to_string()]));
        assert_eq!(result[0].dev_only, BTreeSet::from(["Moderate".to_string()]));
        assert_eq!(result[0].prod_only, BTreeSet::from(["Strong".to_string()]));
        assert!(result[1].shared.is_empty());
        assert_eq!(result[1].dev_only.len(), 1);
        assert!(!result[1].is_identical());
    }

    #[test]
    fn default_columns_are_valid_identifiers() {
        for column in DEFAULT_COMPARE_COLUMNS {
            validate_identifier(column).unwrap();
        }
    }
}
