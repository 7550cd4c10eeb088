//! Build the generated mapping from the panel database dump.

use std::collections::BTreeSet;

use inca_model::{PanelRecord, panel_identifier};
use tracing::debug;

use crate::error::Result;
use crate::table::CodeTable;

/// Codes and panel names matched for one manifest selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelMatch {
    pub codes: Vec<String>,
    pub panel_names: Vec<String>,
}

impl PanelMatch {
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn code(&self) -> String {
        self.codes.join(", ")
    }

    pub fn condition(&self) -> Option<String> {
        if self.panel_names.is_empty() {
            None
        } else {
            Some(self.panel_names.join(", "))
        }
    }
}

/// Match the elements of one selection against the dump.
///
/// A panel matches an element when the element contains the panel name or
/// one of its disorders. Only panels carrying clinical codes contribute.
pub fn match_selection<S: AsRef<str>>(panels: &[PanelRecord], elements: &[S]) -> PanelMatch {
    let mut seen_codes = BTreeSet::new();
    let mut seen_names = BTreeSet::new();
    let mut matched = PanelMatch::default();
    for element in elements {
        let element = element.as_ref();
        for panel in panels {
            if !panel.has_clinical_code() || !panel.matches_element(element) {
                continue;
            }
            for code in panel.clinical_codes() {
                if seen_codes.insert(code.to_string()) {
                    matched.codes.push(code.to_string());
                }
            }
            if seen_names.insert(panel.name.clone()) {
                matched.panel_names.push(panel.name.clone());
            }
        }
    }
    matched
}

/// Generate a mapping for every distinct selection.
///
/// Selections without any coded match get no entry, leaving them to the
/// manual override table.
pub fn generate_mapping<'a, I>(panels: &[PanelRecord], selections: I) -> Result<CodeTable>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut table = CodeTable::new();
    let mut seen = BTreeSet::new();
    for elements in selections {
        let panel_id = panel_identifier(elements);
        if panel_id.trim().is_empty() || !seen.insert(panel_id.clone()) {
            continue;
        }
        let matched = match_selection(panels, elements);
        if matched.is_empty() {
            debug!(panel_id = %panel_id, "no coded panel matched");
            continue;
        }
        table.insert(panel_id, matched.code(), matched.condition())?;
    }
    debug!(entries = table.len(), "generated mapping");
    Ok(table)
}
