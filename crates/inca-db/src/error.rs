//! Error types for database access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the INCA database.
#[derive(Debug, Error)]
pub enum DbError {
    // === Configuration ===
    /// Failed to read the credentials file.
    #[error("failed to read database config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credentials file is not valid JSON or lacks a field.
    #[error("invalid database config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Identifier that cannot be spliced into SQL.
    #[error("invalid SQL identifier '{name}'")]
    InvalidIdentifier { name: String },

    // === Database ===
    /// Failed to open the connection pool.
    #[error("failed to connect to {endpoint}:{port}: {source}")]
    Connect {
        endpoint: String,
        port: u16,
        #[source]
        source: sqlx::Error,
    },

    /// A statement failed.
    #[error("{context}: {source}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Table does not exist or has no visible columns.
    #[error("table {table} not found")]
    TableNotFound { table: String },

    /// Records carry columns the table does not have.
    #[error("table {table} has no column(s): {}", columns.join(", "))]
    UnknownColumns { table: String, columns: Vec<String> },

    /// Every record is empty, so there is nothing to insert.
    #[error("records for {table} have no columns")]
    NoColumns { table: String },

    // === Files ===
    /// Failed to read a JSON dump.
    #[error("failed to read dump {path}: {source}")]
    DumpRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON dump is not an array of objects.
    #[error("invalid dump {path}: {source}")]
    DumpFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DbError {
    pub(crate) fn query(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Query {
            context: context.into(),
            source,
        }
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DbError>;
