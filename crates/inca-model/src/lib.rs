//! Shared value types for the INCA import.
//!
//! Panel dump rows, panel resolutions and the column map of an import record.

pub mod lookup;
pub mod panel;
pub mod record;
pub mod resolution;

pub use lookup::CaseInsensitiveHeaders;
pub use panel::{PanelRecord, is_clinical_code, panel_identifier};
pub use record::{ImportRecord, all_columns, fill_missing_keys};
pub use resolution::{ResolutionResult, ResolutionSource};
