use hsim_core::keys::{ORGAN_OF_ORIGIN_KEY, PRIMARY_DIAGNOSIS_KEY};

use crate::errors::GenerationError;

/// Length of the atlas prefix (`HTA`) preceding the root index of an id.
pub const ROOT_PREFIX_LEN: usize = 3;

static CANCER_TYPES: [&str; 12] = [
    "Infiltrating duct carcinoma, NOS",
    "Adenocarcinoma, NOS",
    "Precursor B-cell lymphoblastic leukemia",
    "Glioblastoma",
    "Melanoma, NOS",
    "Squamous cell carcinoma, NOS",
    "Neuroblastoma, NOS",
    "Serous cystadenocarcinoma, NOS",
    "Hepatocellular carcinoma, NOS",
    "Small cell carcinoma, NOS",
    "Renal cell carcinoma, NOS",
    "Intraductal carcinoma, noninfiltrating, NOS",
];

static ORGANS_OF_ORIGIN: [&str; 12] = [
    "Breast, NOS",
    "Pancreas, NOS",
    "Bone marrow",
    "Brain, NOS",
    "Skin, NOS",
    "Lung, NOS",
    "Adrenal gland, NOS",
    "Ovary",
    "Liver",
    "Bronchus and lung",
    "Kidney, NOS",
    "Breast, NOS",
];

/// Fixed value table for one enumerated field.
#[derive(Debug, Clone, Copy)]
pub struct DomainTable {
    pub field_key: &'static str,
    pub entries: &'static [&'static str],
}

/// Enumerated fields whose value is chosen by the atlas root index instead of at random.
#[derive(Debug, Clone)]
pub struct DomainTables {
    tables: Vec<DomainTable>,
}

impl Default for DomainTables {
    fn default() -> Self {
        Self::htan()
    }
}

impl DomainTables {
    /// Cancer type and organ of origin tables.
    pub fn htan() -> Self {
        Self {
            tables: vec![
                DomainTable {
                    field_key: PRIMARY_DIAGNOSIS_KEY,
                    entries: &CANCER_TYPES,
                },
                DomainTable {
                    field_key: ORGAN_OF_ORIGIN_KEY,
                    entries: &ORGANS_OF_ORIGIN,
                },
            ],
        }
    }

    pub fn empty() -> Self {
        Self { tables: Vec::new() }
    }

    pub fn table(&self, field_key: &str) -> Option<&DomainTable> {
        self.tables.iter().find(|table| table.field_key == field_key)
    }

    /// Value for `field_key` selected by the root index embedded in `self_id`.
    ///
    /// Returns `Ok(None)` when the field has no table. An index outside the
    /// table is an [`GenerationError::IndexOutOfRange`].
    pub fn lookup(
        &self,
        field_key: &str,
        self_id: &str,
    ) -> Result<Option<&'static str>, GenerationError> {
        let Some(table) = self.table(field_key) else {
            return Ok(None);
        };

        let index = root_index(self_id)?;
        let value = table
            .entries
            .get(index)
            .ok_or_else(|| GenerationError::IndexOutOfRange {
                field: field_key.to_string(),
                index,
                len: table.entries.len(),
            })?;
        Ok(Some(*value))
    }
}

/// Numeric component right after the atlas prefix, up to the first `_`.
///
/// `HTA1_0_3` yields `1`.
pub fn root_index(self_id: &str) -> Result<usize, GenerationError> {
    let invalid = || GenerationError::InvalidIdentifier(self_id.to_string());
    let rest = self_id.get(ROOT_PREFIX_LEN..).ok_or_else(invalid)?;
    let digits = rest.split('_').next().unwrap_or_default();
    digits.parse::<usize>().map_err(|_| invalid())
}
