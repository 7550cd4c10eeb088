//! Sample panel resolution and fixed submission fields.

use std::collections::BTreeMap;

use inca_ingest::Manifest;
use inca_map::{MappingError, PanelResolver};
use inca_model::{ImportRecord, ResolutionResult};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// `panel` value for samples absent from the manifest.
pub const SAMPLE_NOT_IN_MANIFEST: &str = "Sample not in Medicover data";

/// Constant columns attached to every submitted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDefaults {
    pub institution: String,
    pub organisation: String,
    pub organisation_id: i64,
    pub collection_method: String,
    pub allele_origin: String,
    pub affected_status: String,
    pub interpreted: String,
    pub probeset_id: String,
}

impl Default for SubmissionDefaults {
    fn default() -> Self {
        Self {
            institution: "East Genomic Laboratory Hub, NHS Genomic Medicine Service".to_string(),
            organisation: "Cambridge Genomics Laboratory".to_string(),
            organisation_id: 288359,
            collection_method: "clinical testing".to_string(),
            allele_origin: "germline".to_string(),
            affected_status: "yes".to_string(),
            interpreted: "yes".to_string(),
            probeset_id: "Medicover TWE".to_string(),
        }
    }
}

impl SubmissionDefaults {
    pub fn apply(&self, record: &mut ImportRecord) {
        record.set("institution", self.institution.as_str());
        record.set("organisation", self.organisation.as_str());
        record.set("organisation_id", self.organisation_id);
        record.set("collection_method", self.collection_method.as_str());
        record.set("allele_origin", self.allele_origin.as_str());
        record.set("affected_status", self.affected_status.as_str());
        record.set("interpreted", self.interpreted.as_str());
        record.set("probeset_id", self.probeset_id.as_str());
    }
}

/// Resolution of one manifest sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleResolution {
    /// Panel column value.
    pub panel_label: String,
    /// `None` when the sample's panel identifier was rejected.
    pub resolution: Option<ResolutionResult>,
}

/// Resolutions for every manifest sample, computed once per run.
#[derive(Debug, Clone, Default)]
pub struct SampleResolutions {
    by_sample: BTreeMap<String, SampleResolution>,
    errors: Vec<(String, MappingError)>,
}

impl SampleResolutions {
    pub fn build(manifest: &Manifest, resolver: &PanelResolver) -> Self {
        let mut resolutions = Self::default();
        for sample in manifest.samples() {
            let resolution = match resolver.resolve(&sample.panel_id()) {
                Ok(result) => {
                    if !result.is_resolved() {
                        debug!(panel_id = %result.panel_id, "panel unresolved");
                    }
                    Some(result)
                }
                Err(error) => {
                    debug!(error = %error, "sample panel could not be resolved");
                    resolutions
                        .errors
                        .push((sample.sample_number.clone(), error));
                    None
                }
            };
            resolutions.by_sample.insert(
                sample.sample_number.clone(),
                SampleResolution {
                    panel_label: sample.panel_label(),
                    resolution,
                },
            );
        }
        resolutions
    }

    /// Give unresolved samples the condition name curated for their panel.
    pub fn with_curated_conditions(mut self, conditions: &BTreeMap<String, String>) -> Self {
        let unresolved = self
            .by_sample
            .values_mut()
            .filter_map(|sample| sample.resolution.as_mut())
            .filter(|result| !result.is_resolved() && result.condition.is_none());
        for result in unresolved {
            if let Some(condition) = conditions.get(&result.panel_id) {
                result.condition = Some(condition.clone());
            }
        }
        self
    }

    pub fn get(&self, sample_number: &str) -> Option<&SampleResolution> {
        self.by_sample.get(&sample_number.trim().to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SampleResolution)> {
        self.by_sample
            .iter()
            .map(|(sample, resolution)| (sample.as_str(), resolution))
    }

    /// Samples whose panel identifier was rejected.
    pub fn errors(&self) -> &[(String, MappingError)] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.by_sample.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sample.is_empty()
    }
}

/// Attach the panel columns for the report's sample.
///
/// Reports without a sample number get no panel columns.
pub fn attach_panel(
    record: &mut ImportRecord,
    sample_number: Option<&str>,
    resolutions: &SampleResolutions,
) {
    let Some(sample_number) = sample_number else {
        return;
    };
    let Some(sample) = resolutions.get(sample_number) else {
        record.set("panel", SAMPLE_NOT_IN_MANIFEST);
        return;
    };
    if let Some(resolution) = &sample.resolution {
        if let Some(condition) = &resolution.condition {
            record.set("preferred_condition_name", condition.as_str());
        }
        if let Some(code) = &resolution.code {
            record.set("r_code", code.as_str());
        }
    }
    record.set("panel", sample.panel_label.as_str());
}

/// A fresh identifier for `local_id` and `linking_id`.
pub fn new_local_id() -> String {
    format!("uid_{}", Uuid::now_v7().simple())
}
