use thiserror::Error;

/// Errors raised while turning one variant into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Reference/alternate value is not of the form `REF/ALT`.
    #[error("expected REF/ALT, found '{value}'")]
    RefAlt { value: String },

    /// Evaluation date is not `MM/DD/YYYY`.
    #[error("invalid evaluation date '{value}', expected MM/DD/YYYY")]
    InvalidDate { value: String },

    /// Evaluation has no `variants` array.
    #[error("evaluation has no variants array")]
    MissingVariants,
}

pub type Result<T> = std::result::Result<T, TransformError>;
