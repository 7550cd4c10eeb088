//! Database credentials and connection.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use crate::error::{DbError, Result};
use crate::ident::{TableRef, validate_identifier};

/// Credentials file contents.
///
/// ```json
/// {"user": "inca", "pwd": "...", "endpoint": "db.example.org", "port": 5432}
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub user: String,
    pub pwd: String,
    pub endpoint: String,
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_database() -> String {
    "ngtd".to_string()
}

fn default_schema() -> String {
    "testdirectory".to_string()
}

fn default_table() -> String {
    "inca".to_string()
}

// Keeps the password out of logs.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl DbConfig {
    /// Load a credentials file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| DbError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DbError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Target table, with schema and table names validated.
    pub fn table_ref(&self) -> Result<TableRef> {
        TableRef::new(&self.schema, &self.table)
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.endpoint)
            .port(self.port)
            .username(&self.user)
            .password(&self.pwd)
            .database(&self.database)
    }
}

/// Open a small connection pool for `config`.
pub async fn connect(config: &DbConfig) -> Result<PgPool> {
    validate_identifier(&config.schema)?;
    validate_identifier(&config.table)?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(config.connect_options())
        .await
        .map_err(|source| DbError::Connect {
            endpoint: config.endpoint.clone(),
            port: config.port,
            source,
        })?;
    info!(
        endpoint = %config.endpoint,
        database = %config.database,
        "connected to database"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let config: DbConfig = serde_json::from_str(
            r#"{"user": "u", "pwd": "secret", "endpoint": "localhost", "port": 5432}"#,
        )
        .unwrap();
        assert_eq!(config.database, "ngtd");
        assert_eq!(config.schema, "testdirectory");
        assert_eq!(config.table, "inca");
        assert_eq!(config.table_ref().unwrap().to_string(), "\"testdirectory\".\"inca\"");
    }

    #[test]
    fn debug_hides_password() {
        let config: DbConfig = serde_json::from_str(
            r#"{"user": "u", "pwd": "secret", "endpoint": "localhost", "port": 5432}"#,
        )
        .unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn load_reports_missing_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"user": "u", "endpoint": "localhost", "port": 5432}}"#).unwrap();
        let error = DbConfig::load(file.path()).unwrap_err();
        assert!(matches!(error, DbError::ConfigParse { .. }));
        assert!(error.to_string().contains("pwd"));
    }
}
