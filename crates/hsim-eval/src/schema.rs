use jsonschema::JSONSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use hsim_core::GeneratedDataset;

use crate::errors::EvalError;

/// A structural problem in a dataset document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer of the offending value.
    pub path: String,
    pub message: String,
}

/// JSON Schema describing a generated dataset document.
pub fn dataset_json_schema() -> Result<Value, EvalError> {
    Ok(serde_json::to_value(schema_for!(GeneratedDataset))?)
}

/// Validate a dataset document against [`dataset_json_schema`].
///
/// Returns every violation; an empty list means the document is well formed.
pub fn validate_dataset_json(document: &Value) -> Result<Vec<SchemaViolation>, EvalError> {
    let schema = dataset_json_schema()?;
    let compiled = JSONSchema::compile(&schema).map_err(|err| EvalError::Schema(err.to_string()))?;

    let mut violations = Vec::new();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            violations.push(SchemaViolation {
                path: normalized_json_pointer(&error.instance_path.to_string()),
                message: error.to_string(),
            });
        }
    }
    Ok(violations)
}

/// Validate then deserialize a dataset document.
pub fn parse_dataset(document: &Value) -> Result<GeneratedDataset, EvalError> {
    let violations = validate_dataset_json(document)?;
    if let Some(first) = violations.first() {
        return Err(EvalError::InvalidDataset(format!(
            "{} structural violation(s), first at {}: {}",
            violations.len(),
            first.path,
            first.message
        )));
    }
    Ok(serde_json::from_value(document.clone())?)
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
