//! Well-known schema keys and collection labels of the HTAN data model.

/// Self-referential component dependency, never part of a record template.
pub const COMPONENT_KEY: &str = "bts:Component";

pub const PARTICIPANT_ID_KEY: &str = "bts:HTANParticipantID";
pub const BIOSPECIMEN_ID_KEY: &str = "bts:HTANBiospecimenID";
pub const PARENT_BIOSPECIMEN_ID_KEY: &str = "bts:HTANParentBiospecimenID";
pub const PARENT_ID_KEY: &str = "bts:HTANParentID";

pub const PRIMARY_DIAGNOSIS_KEY: &str = "bts:PrimaryDiagnosis";
pub const ORGAN_OF_ORIGIN_KEY: &str = "bts:TissueorOrganofOrigin";

pub const BIOSPECIMEN_COLLECTION: &str = "Biospecimen";
pub const DEMOGRAPHICS_COLLECTION: &str = "Demographics";

/// True for the component key in either spelling used by HTAN schemas.
pub fn is_component_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(COMPONENT_KEY)
}
