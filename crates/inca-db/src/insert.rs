//! Bulk record insertion.

use std::collections::BTreeMap;

use inca_model::{ImportRecord, all_columns};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::error::{DbError, Result};
use crate::ident::{TableRef, quote_identifier, validate_identifier};

/// Postgres caps bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// A column as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub data_type: String,
    pub udt_schema: String,
    pub udt_name: String,
}

impl TableColumn {
    /// Type name usable in `CAST(... AS <type>)`.
    pub fn cast_type(&self) -> String {
        format!(
            "{}.{}",
            quote_identifier(&self.udt_schema),
            quote_identifier(&self.udt_name)
        )
    }
}

/// Columns of `table`, in table order.
pub async fn reflect_columns(pool: &PgPool, table: &TableRef) -> Result<Vec<TableColumn>> {
    let rows: Vec<(String, String, String, String)> = sqlx::query_as(
        r#"
        SELECT column_name::text, data_type::text, udt_schema::text, udt_name::text
        FROM information_schema.columns
        WHERE table_schema = $1 AND table_name = $2
        ORDER BY ordinal_position
        "#,
    )
    .bind(table.schema())
    .bind(table.table())
    .fetch_all(pool)
    .await
    .map_err(|source| DbError::query(format!("reflecting {table}"), source))?;

    if rows.is_empty() {
        return Err(DbError::TableNotFound {
            table: table.to_string(),
        });
    }
    Ok(rows
        .into_iter()
        .map(|(name, data_type, udt_schema, udt_name)| TableColumn {
            name,
            data_type,
            udt_schema,
            udt_name,
        })
        .collect())
}

/// Insert `records` into `table` in a single transaction.
///
/// Every record key must name a table column; keys a record lacks are
/// inserted as NULL. Values are bound as text and cast to the column type
/// server side. Returns the number of inserted rows.
pub async fn insert_records(pool: &PgPool, table: &TableRef, records: &[ImportRecord]) -> Result<u64> {
    if records.is_empty() {
        return Ok(0);
    }
    let reflected = reflect_columns(pool, table).await?;
    let columns = target_columns(table, &reflected, records)?;
    let column_list = columns
        .iter()
        .map(|column| quote_identifier(&column.name))
        .collect::<Vec<_>>()
        .join(", ");
    let rows_per_statement = (MAX_BIND_PARAMS / columns.len()).max(1);

    let mut tx = pool
        .begin()
        .await
        .map_err(|source| DbError::query("starting transaction", source))?;
    let mut inserted = 0;
    for chunk in records.chunks(rows_per_statement) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {table} ({column_list}) "));
        builder.push_values(chunk, |mut row, record| {
            for column in &columns {
                row.push("CAST(")
                    .push_bind_unseparated(bind_text(record.get(&column.name)))
                    .push_unseparated(format!(" AS {})", column.cast_type()));
            }
        });
        let result = builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|source| DbError::query(format!("inserting into {table}"), source))?;
        inserted += result.rows_affected();
        debug!(rows = chunk.len(), "insert statement executed");
    }
    tx.commit()
        .await
        .map_err(|source| DbError::query("committing insert", source))?;

    info!(table = %table, rows = inserted, "records inserted");
    Ok(inserted)
}

/// Reflected columns for the keys used by `records`, rejecting unknown keys.
fn target_columns<'a>(
    table: &TableRef,
    reflected: &'a [TableColumn],
    records: &[ImportRecord],
) -> Result<Vec<&'a TableColumn>> {
    let by_name: BTreeMap<&str, &TableColumn> = reflected
        .iter()
        .map(|column| (column.name.as_str(), column))
        .collect();
    let mut columns = Vec::new();
    let mut unknown = Vec::new();
    for name in all_columns(records) {
        match by_name.get(name.as_str()) {
            Some(column) => columns.push(*column),
            None => unknown.push(name),
        }
    }
    if !unknown.is_empty() {
        return Err(DbError::UnknownColumns {
            table: table.to_string(),
            columns: unknown,
        });
    }
    if columns.is_empty() {
        return Err(DbError::NoColumns {
            table: table.to_string(),
        });
    }
    for column in &columns {
        validate_identifier(&column.name)?;
    }
    Ok(columns)
}

/// Text form of a record value; `None` binds NULL.
fn bind_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}
