use serde::{Deserialize, Serialize};

use hsim_core::keys::{BIOSPECIMEN_COLLECTION, DEMOGRAPHICS_COLLECTION};
use hsim_core::{GeneratedDataset, SimulatedValue, TemplateKind, TemplateSpec};

/// Options for dataset verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Fail when any violation is found.
    pub strict: bool,
    /// Limit the number of examples emitted in the report.
    pub max_examples: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_examples: 20,
        }
    }
}

/// A collection of the dataset, addressed by its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub label: String,
    pub kind: TemplateKind,
}

impl CollectionRef {
    pub fn new(label: impl Into<String>, kind: TemplateKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Collections produced by the default generation options.
pub fn default_collections() -> Vec<CollectionRef> {
    vec![
        CollectionRef::new(DEMOGRAPHICS_COLLECTION, TemplateKind::Clinical),
        CollectionRef::new("Diagnosis", TemplateKind::Clinical),
        CollectionRef::new("FollowUp", TemplateKind::Clinical),
        CollectionRef::new("Exposure", TemplateKind::Clinical),
        CollectionRef::new("Therapy", TemplateKind::Clinical),
        CollectionRef::new(BIOSPECIMEN_COLLECTION, TemplateKind::Biospecimen),
        CollectionRef::new("ScRNA-seqLevel1", TemplateKind::Assay),
    ]
}

/// Map configured templates to collection labels through the data blocks.
///
/// Templates that no atlas carries are skipped.
pub fn resolve_collections(
    dataset: &GeneratedDataset,
    templates: &[TemplateSpec],
) -> Vec<CollectionRef> {
    let mut collections: Vec<CollectionRef> = Vec::new();
    for template in templates {
        let label = dataset.atlases.iter().find_map(|atlas| {
            atlas
                .collections
                .iter()
                .find(|(_, block)| block.data_schema == template.key)
                .map(|(label, _)| label.clone())
        });
        if let Some(label) = label {
            if !collections.iter().any(|existing| existing.label == label) {
                collections.push(CollectionRef::new(label, template.kind));
            }
        }
    }
    collections
}

/// Kind of broken reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// An assay record names a biospecimen that is not listed.
    UnknownBiospecimen,
    /// A biospecimen names a parent that is neither a participant nor a sample.
    UnknownParent,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::UnknownBiospecimen => "unknown_biospecimen",
            ViolationCode::UnknownParent => "unknown_parent",
        }
    }
}

/// A dangling reference found in one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub atlas: String,
    pub collection: String,
    pub field: String,
    pub value: SimulatedValue,
    pub row_index: u64,
}

impl Violation {
    /// Human-readable form of the violation.
    pub fn message(&self) -> String {
        match self.code {
            ViolationCode::UnknownBiospecimen => format!(
                "Within {}, we have {}:{}, but this ID does not exist within the Biospecimen list.",
                self.collection, self.field, self.value
            ),
            ViolationCode::UnknownParent => format!(
                "Within {}, we have {}:{}, but this ID does not exist within the Biospecimen or Demographics list.",
                self.collection, self.field, self.value
            ),
        }
    }
}

/// Structured warning entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningItem {
    pub code: String,
    pub path: String,
    pub message: String,
}

impl WarningItem {
    pub fn new(code: &str, path: String, message: String) -> Self {
        Self {
            code: code.to_string(),
            path,
            message,
        }
    }
}

/// Counters for one verification phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub records_checked: u64,
    pub violations: u64,
}

/// Outcome of an integrity scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub assay_references: PhaseStats,
    pub biospecimen_parents: PhaseStats,
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<WarningItem>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violation_count(&self) -> u64 {
        self.violations.len() as u64
    }

    /// Messages of every violation in discovery order.
    pub fn error_list(&self) -> Vec<String> {
        self.violations.iter().map(Violation::message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_published_format() {
        let violation = Violation {
            code: ViolationCode::UnknownBiospecimen,
            atlas: "HTA1".to_string(),
            collection: "ScRNA-seqLevel1".to_string(),
            field: "bts:HTANParentBiospecimenID".to_string(),
            value: SimulatedValue::Text("XYZ".to_string()),
            row_index: 0,
        };
        assert_eq!(
            violation.message(),
            "Within ScRNA-seqLevel1, we have bts:HTANParentBiospecimenID:XYZ, but this ID does not exist within the Biospecimen list."
        );

        let violation = Violation {
            code: ViolationCode::UnknownParent,
            atlas: "HTA1".to_string(),
            collection: "Biospecimen".to_string(),
            field: "bts:HTANParentID".to_string(),
            value: SimulatedValue::Null,
            row_index: 3,
        };
        assert_eq!(
            violation.message(),
            "Within Biospecimen, we have bts:HTANParentID:null, but this ID does not exist within the Biospecimen or Demographics list."
        );
    }

    #[test]
    fn default_collections_have_one_assay() {
        let collections = default_collections();
        assert_eq!(collections.len(), 7);
        let assays: Vec<&str> = collections
            .iter()
            .filter(|c| c.kind == TemplateKind::Assay)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(assays, vec!["ScRNA-seqLevel1"]);
    }
}
