//! Error types for mapping operations.

use thiserror::Error;

/// Errors from building code tables or resolving panels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Panel identifier was empty.
    #[error("invalid input: panel identifier is empty")]
    InvalidInput,

    /// One identifier was given two different codes in the same table.
    #[error("panel '{panel_id}' already maps to '{existing}', refusing '{new}'")]
    ConflictingCode {
        panel_id: String,
        existing: String,
        new: String,
    },
}

pub type Result<T> = std::result::Result<T, MappingError>;
