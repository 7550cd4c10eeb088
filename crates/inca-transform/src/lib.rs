//! Report evaluation to INCA record conversion.
//!
//! Each reported variant becomes one [`inca_model::ImportRecord`]: the field
//! map extracts report values, the sample's panel resolution adds the panel
//! columns, and [`SubmissionDefaults`] adds the fixed submission columns.

pub mod enrich;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;

pub use enrich::{
    SAMPLE_NOT_IN_MANIFEST, SampleResolution, SampleResolutions, SubmissionDefaults,
    attach_panel, new_local_id,
};
pub use error::{Result, TransformError};
pub use extract::extract_variant;
pub use normalize::ACGS_CODES;
pub use pipeline::{RecordContext, RecordIssue, ReportRecords, process_report};
