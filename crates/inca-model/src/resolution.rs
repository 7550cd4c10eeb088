//! Outcome of resolving a panel identifier to a clinical code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which table produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// Found in the generated mapping.
    Mapped,
    /// Found in the hand-curated override table.
    Manual,
    /// Found in neither table; needs manual review.
    Unresolved,
}

impl ResolutionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mapped => "mapped",
            Self::Manual => "manual",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution of one panel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub panel_id: String,
    /// Absent when `source` is [`ResolutionSource::Unresolved`].
    pub code: Option<String>,
    pub source: ResolutionSource,
    /// Condition name attached to the matching table entry, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl ResolutionResult {
    pub fn mapped(panel_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            panel_id: panel_id.into(),
            code: Some(code.into()),
            source: ResolutionSource::Mapped,
            condition: None,
        }
    }

    pub fn manual(panel_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            panel_id: panel_id.into(),
            code: Some(code.into()),
            source: ResolutionSource::Manual,
            condition: None,
        }
    }

    pub fn unresolved(panel_id: impl Into<String>) -> Self {
        Self {
            panel_id: panel_id.into(),
            code: None,
            source: ResolutionSource::Unresolved,
            condition: None,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Option<String>) -> Self {
        self.condition = condition;
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.source != ResolutionSource::Unresolved
    }
}
