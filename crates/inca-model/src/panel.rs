//! Panel metadata loaded from the panel database dump.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static CLINICAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R[0-9]+").expect("valid clinical code pattern"));

/// A gene panel with the disorders it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRecord {
    /// Panel database identifier.
    pub id: String,
    /// Display name of the panel.
    pub name: String,
    /// Relevant disorders in dump order, without duplicates.
    pub relevant_disorders: Vec<String>,
}

impl PanelRecord {
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, disorders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let relevant_disorders = disorders
            .into_iter()
            .map(Into::into)
            .filter(|disorder: &String| seen.insert(disorder.clone()))
            .collect();
        Self {
            id: id.into(),
            name: name.into(),
            relevant_disorders,
        }
    }

    /// Disorders that carry a clinical code (`R` followed by digits).
    pub fn clinical_codes(&self) -> Vec<&str> {
        self.relevant_disorders
            .iter()
            .filter(|disorder| CLINICAL_CODE.is_match(disorder))
            .map(String::as_str)
            .collect()
    }

    pub fn has_clinical_code(&self) -> bool {
        self.relevant_disorders
            .iter()
            .any(|disorder| CLINICAL_CODE.is_match(disorder))
    }

    /// True when a manifest panel element refers to this panel, either by
    /// name or by one of its disorders.
    pub fn matches_element(&self, element: &str) -> bool {
        if !self.name.is_empty() && element.contains(self.name.as_str()) {
            return true;
        }
        self.relevant_disorders
            .iter()
            .any(|disorder| !disorder.is_empty() && element.contains(disorder.as_str()))
    }
}

/// Identifier of a manifest panel selection: elements with leading
/// underscores stripped, joined with `", "`.
pub fn panel_identifier<S: AsRef<str>>(elements: &[S]) -> String {
    elements
        .iter()
        .map(|element| element.as_ref().trim_start_matches('_'))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns true when `value` looks like a clinical code, e.g. `R134`.
pub fn is_clinical_code(value: &str) -> bool {
    CLINICAL_CODE.is_match(value)
}
