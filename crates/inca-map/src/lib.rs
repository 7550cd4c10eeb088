//! Panel to clinical code mapping.
//!
//! - [`resolve`]: the lookup with gap-filling manual overrides
//! - [`generate_mapping`]: derive the mapping from the panel database dump
//! - [`CodeTable`]: the identifier to code tables both work on

#![deny(unsafe_code)]

pub mod error;
pub mod generate;
pub mod resolve;
pub mod table;

pub use error::{MappingError, Result};
pub use generate::{PanelMatch, generate_mapping, match_selection};
pub use resolve::{PanelResolver, ResolutionReport, resolve};
pub use table::{CodeEntry, CodeTable, Overlap, check_overlaps};
