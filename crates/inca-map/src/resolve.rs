//! Panel Resolver.
//!
//! A panel identifier is looked up in the generated mapping first and in the
//! manual override table second. Overrides only fill gaps in the mapping;
//! they never replace an authoritative entry. Identifiers found in neither
//! table come back tagged [`ResolutionSource::Unresolved`] so they can be
//! surfaced for review instead of aborting the run.

use inca_model::{ResolutionResult, ResolutionSource};
use tracing::trace;

use crate::error::{MappingError, Result};
use crate::table::CodeTable;

/// Resolve one panel identifier.
///
/// # Errors
///
/// Returns [`MappingError::InvalidInput`] when `panel_id` is empty or only
/// whitespace. An identifier missing from both tables is not an error.
pub fn resolve(
    panel_id: &str,
    mapping: &CodeTable,
    manual_overrides: &CodeTable,
) -> Result<ResolutionResult> {
    if panel_id.trim().is_empty() {
        return Err(MappingError::InvalidInput);
    }
    let result = if let Some(entry) = mapping.get(panel_id) {
        ResolutionResult::mapped(panel_id, entry.code.clone())
            .with_condition(entry.condition.clone())
    } else if let Some(entry) = manual_overrides.get(panel_id) {
        ResolutionResult::manual(panel_id, entry.code.clone())
            .with_condition(entry.condition.clone())
    } else {
        ResolutionResult::unresolved(panel_id)
    };
    trace!(source = %result.source, "panel resolved");
    Ok(result)
}

/// The two lookup tables of a run.
#[derive(Debug, Clone, Default)]
pub struct PanelResolver {
    mapping: CodeTable,
    manual_overrides: CodeTable,
}

impl PanelResolver {
    pub fn new(mapping: CodeTable, manual_overrides: CodeTable) -> Self {
        Self {
            mapping,
            manual_overrides,
        }
    }

    pub fn mapping(&self) -> &CodeTable {
        &self.mapping
    }

    pub fn manual_overrides(&self) -> &CodeTable {
        &self.manual_overrides
    }

    pub fn resolve(&self, panel_id: &str) -> Result<ResolutionResult> {
        resolve(panel_id, &self.mapping, &self.manual_overrides)
    }

    /// Resolve many identifiers, keeping input order.
    ///
    /// Invalid identifiers are collected in [`ResolutionReport::invalid`]
    /// rather than stopping the batch.
    pub fn resolve_all<I, S>(&self, panel_ids: I) -> ResolutionReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ResolutionReport::default();
        for (index, panel_id) in panel_ids.into_iter().enumerate() {
            match self.resolve(panel_id.as_ref()) {
                Ok(result) => report.results.push(result),
                Err(_) => report.invalid.push(index),
            }
        }
        report
    }
}

/// Results of a batch resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub results: Vec<ResolutionResult>,
    /// Input positions whose identifier was rejected.
    pub invalid: Vec<usize>,
}

impl ResolutionReport {
    pub fn count(&self, source: ResolutionSource) -> usize {
        self.results
            .iter()
            .filter(|result| result.source == source)
            .count()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|result| result.source == ResolutionSource::Unresolved)
            .map(|result| result.panel_id.as_str())
    }
}
