//! Panel identifier to clinical code tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};

/// A code together with the condition name it was curated or matched under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    pub condition: Option<String>,
}

/// Immutable-after-load lookup from panel identifier to code.
///
/// Used both for the generated mapping and for the manual override table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTable {
    entries: BTreeMap<String, CodeEntry>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(panel_id, code)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (panel_id, code) in pairs {
            table.insert(panel_id, code, None)?;
        }
        Ok(table)
    }

    /// Add an entry. Re-inserting the same code is a no-op; a different code
    /// for a known identifier is rejected.
    pub fn insert(
        &mut self,
        panel_id: impl Into<String>,
        code: impl Into<String>,
        condition: Option<String>,
    ) -> Result<()> {
        let panel_id = panel_id.into();
        let code = code.into();
        if panel_id.trim().is_empty() {
            return Err(MappingError::InvalidInput);
        }
        match self.entries.get_mut(&panel_id) {
            Some(existing) if existing.code == code => {
                if existing.condition.is_none() {
                    existing.condition = condition;
                }
                Ok(())
            }
            Some(existing) => Err(MappingError::ConflictingCode {
                panel_id,
                existing: existing.code.clone(),
                new: code,
            }),
            None => {
                self.entries.insert(panel_id, CodeEntry { code, condition });
                Ok(())
            }
        }
    }

    pub fn get(&self, panel_id: &str) -> Option<&CodeEntry> {
        self.entries.get(panel_id)
    }

    pub fn code(&self, panel_id: &str) -> Option<&str> {
        self.entries.get(panel_id).map(|entry| entry.code.as_str())
    }

    pub fn contains(&self, panel_id: &str) -> bool {
        self.entries.contains_key(panel_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodeEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An identifier present in both the generated mapping and the overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub panel_id: String,
    pub mapped_code: String,
    pub manual_code: String,
}

impl Overlap {
    /// The two tables disagree on the code.
    pub fn is_conflict(&self) -> bool {
        self.mapped_code != self.manual_code
    }
}

/// Identifiers listed in both tables. The generated mapping wins at
/// resolution time, so the override entry is dead weight or a curation error.
pub fn check_overlaps(mapping: &CodeTable, manual: &CodeTable) -> Vec<Overlap> {
    mapping
        .iter()
        .filter_map(|(panel_id, mapped)| {
            manual.get(panel_id).map(|overridden| Overlap {
                panel_id: panel_id.to_string(),
                mapped_code: mapped.code.clone(),
                manual_code: overridden.code.clone(),
            })
        })
        .collect()
}
