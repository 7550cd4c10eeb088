//! PostgreSQL access for the INCA table.
//!
//! Handles:
//! - Credentials files and pool setup
//! - Bulk insertion of [`inca_model::ImportRecord`]s with server-side casts
//! - JSON dumps that can be imported later without re-parsing reports
//! - Per-column value comparison between two databases

mod compare;
mod config;
mod dump;
mod error;
mod ident;
mod insert;

pub use compare::{
    ColumnComparison, ColumnValues, DEFAULT_COMPARE_COLUMNS, DEFAULT_COMPARISON_FILE, NULL_TEXT,
    compare_columns, fetch_column_values, fetch_distinct_values, write_comparison_tsv,
};
pub use config::{DbConfig, connect};
pub use dump::{DEFAULT_DUMP_FILE, load_dump, write_dump};
pub use error::{DbError, Result};
pub use ident::{TableRef, quote_identifier, validate_identifier};
pub use insert::{TableColumn, insert_records, reflect_columns};
pub use sqlx::PgPool;
