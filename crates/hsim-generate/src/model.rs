use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use hsim_core::{TemplateKind, TemplateSpec};

use crate::errors::GenerationError;

/// Link recorded on every generated data block.
pub const DEFAULT_DATA_LINK: &str = "https://www.synapse.org/#!Synapse:synXXXX/tables/YYYYY";

/// Atlas identity written at the top of each atlas object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasSpec {
    pub htan_id: String,
    pub htan_name: String,
}

impl AtlasSpec {
    pub fn new(htan_id: impl Into<String>, htan_name: impl Into<String>) -> Self {
        Self {
            htan_id: htan_id.into(),
            htan_name: htan_name.into(),
        }
    }
}

/// Options for the generation engine.
///
/// Every field has a default, so a partial TOML document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Base seed; each atlas derives its own stream from it.
    pub seed: u64,
    pub participants: usize,
    pub samples_per_participant: usize,
    pub data_link: String,
    pub atlases: Vec<AtlasSpec>,
    /// Record types to generate, in output order.
    pub templates: Vec<TemplateSpec>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            participants: 10,
            samples_per_participant: 6,
            data_link: DEFAULT_DATA_LINK.to_string(),
            atlases: default_atlases(),
            templates: default_templates(),
        }
    }
}

impl GenerateOptions {
    /// Reject configurations that cannot produce a dataset.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.atlases.is_empty() {
            return Err(GenerationError::InvalidOptions(
                "at least one atlas is required".to_string(),
            ));
        }
        if self.templates.is_empty() {
            return Err(GenerationError::InvalidOptions(
                "at least one template is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for atlas in &self.atlases {
            if atlas.htan_id.trim().is_empty() {
                return Err(GenerationError::InvalidOptions(
                    "atlas htan_id must not be empty".to_string(),
                ));
            }
            if !seen.insert(atlas.htan_id.as_str()) {
                return Err(GenerationError::InvalidOptions(format!(
                    "duplicate atlas id '{}'",
                    atlas.htan_id
                )));
            }
        }

        for template in &self.templates {
            if template.key.trim().is_empty() {
                return Err(GenerationError::InvalidOptions(
                    "template key must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

pub fn default_atlases() -> Vec<AtlasSpec> {
    vec![
        AtlasSpec::new("HTA1", "HTAPP Pilot Project"),
        AtlasSpec::new("HTA2", "PCAPP Pilot Project"),
    ]
}

pub fn default_templates() -> Vec<TemplateSpec> {
    vec![
        TemplateSpec::new("bts:Demographics", TemplateKind::Clinical),
        TemplateSpec::new("bts:Diagnosis", TemplateKind::Clinical),
        TemplateSpec::new("bts:FollowUp", TemplateKind::Clinical),
        TemplateSpec::new("bts:Exposure", TemplateKind::Clinical),
        TemplateSpec::new("bts:Therapy", TemplateKind::Clinical),
        TemplateSpec::new("bts:Biospecimen", TemplateKind::Biospecimen),
        TemplateSpec::new("bts:ScRNA-seqLevel1", TemplateKind::Assay),
    ]
}

/// Rows written for one collection of one atlas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionReport {
    pub label: String,
    pub data_schema: String,
    pub kind: TemplateKind,
    pub rows: u64,
}

/// Summary of one generated atlas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasReport {
    pub htan_id: String,
    pub participants: u64,
    pub samples: u64,
    pub collections: Vec<CollectionReport>,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub started_at: String,
    pub schema_fingerprint: String,
    pub seed: u64,
    pub atlases: Vec<AtlasReport>,
    pub rows_total: u64,
    /// Template keys listed more than once in the options; generated once.
    pub duplicate_templates: Vec<String>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, schema_fingerprint: String, seed: u64) -> Self {
        Self {
            run_id,
            started_at: chrono::Utc::now().to_rfc3339(),
            schema_fingerprint,
            seed,
            atlases: Vec::new(),
            rows_total: 0,
            duplicate_templates: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_atlas(&mut self, atlas: AtlasReport) {
        self.rows_total += atlas.collections.iter().map(|c| c.rows).sum::<u64>();
        self.atlases.push(atlas);
    }

    /// Row counts keyed by `atlas/label`.
    pub fn row_counts(&self) -> BTreeMap<String, u64> {
        self.atlases
            .iter()
            .flat_map(|atlas| {
                atlas
                    .collections
                    .iter()
                    .map(move |c| (format!("{}/{}", atlas.htan_id, c.label), c.rows))
            })
            .collect()
    }
}
