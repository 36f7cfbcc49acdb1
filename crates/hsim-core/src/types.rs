use serde::{Deserialize, Serialize};

/// Value domain inferred for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    Numeric,
    Enumerated,
    String,
}

/// Classify a field from its option list and description.
///
/// The schema carries no declared data type, so this is a heuristic: any
/// option list makes the field enumerated, otherwise a description mentioning
/// "number" or "numeric" (case-insensitive) makes it numeric.
pub fn infer_type(option_list: &[String], description: &str) -> InferredType {
    if !option_list.is_empty() {
        return InferredType::Enumerated;
    }

    let description = description.to_lowercase();
    if description.contains("number") || description.contains("numeric") {
        InferredType::Numeric
    } else {
        InferredType::String
    }
}

/// A schema field resolved for one record template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    id: String,
    display_name: String,
    description: String,
    inferred_type: InferredType,
    option_list: Vec<String>,
}

impl FieldDescriptor {
    /// Build a descriptor; the type is always derived from the inputs so that
    /// `Enumerated` holds exactly when `option_list` is non-empty.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        option_list: Vec<String>,
    ) -> Self {
        let description = description.into();
        let inferred_type = infer_type(&option_list, &description);
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description,
            inferred_type,
            option_list,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn inferred_type(&self) -> InferredType {
        self.inferred_type
    }

    pub fn option_list(&self) -> &[String] {
        &self.option_list
    }
}
