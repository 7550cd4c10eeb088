//! SQL identifier handling.
//!
//! Schema, table and column names are spliced into statements, so every
//! name coming from configuration or record keys is validated first.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DbError, Result};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid identifier regex"));

/// Accept plain lower or mixed case identifiers of at most 63 bytes.
pub fn validate_identifier(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(DbError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

/// Double-quote `name`, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A validated `schema.table` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    schema: String,
    table: String,
}

impl TableRef {
    pub fn new(schema: &str, table: &str) -> Result<Self> {
        validate_identifier(schema)?;
        validate_identifier(table)?;
        Ok(Self {
            schema: schema.to_string(),
            table: table.to_string(),
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            quote_identifier(&self.schema),
            quote_identifier(&self.table)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(validate_identifier("germline_classification").is_ok());
        assert!(validate_identifier("_x1").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("inca; drop table inca").is_err());
        assert!(validate_identifier("a\"b").is_err());
        assert!(validate_identifier(&"a".repeat(64)).is_err());
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_identifier("int4"), "\"int4\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
