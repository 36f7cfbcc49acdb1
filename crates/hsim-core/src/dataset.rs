use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, ObjectValidation, Schema, SchemaObject};
use serde::{Deserialize, Serialize};

use crate::template::ColumnIndex;

/// A generated dataset: per-atlas record collections plus their field metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedDataset {
    pub atlases: Vec<Atlas>,
    pub schemas: Vec<SchemaEntry>,
}

impl GeneratedDataset {
    /// Field metadata for a collection label.
    pub fn schema(&self, label: &str) -> Option<&SchemaEntry> {
        self.schemas.iter().find(|entry| entry.data_schema == label)
    }
}

/// One atlas (research center) with one data block per record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atlas {
    pub htan_id: String,
    pub htan_name: String,
    /// Data blocks keyed by record-type label (e.g. `Demographics`).
    #[serde(flatten)]
    pub collections: BTreeMap<String, DataBlock>,
}

impl Atlas {
    pub fn collection(&self, label: &str) -> Option<&DataBlock> {
        self.collections.get(label)
    }
}

// Written by hand: every key besides the two ids must hold a data block.
impl JsonSchema for Atlas {
    fn schema_name() -> String {
        "Atlas".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let mut object = ObjectValidation::default();
        for key in ["htan_id", "htan_name"] {
            object
                .properties
                .insert(key.to_string(), generator.subschema_for::<String>());
            object.required.insert(key.to_string());
        }
        object.additional_properties = Some(Box::new(generator.subschema_for::<DataBlock>()));

        Schema::Object(SchemaObject {
            instance_type: Some(InstanceType::Object.into()),
            object: Some(Box::new(object)),
            ..SchemaObject::default()
        })
    }
}

/// Records of one record type within an atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataBlock {
    /// Schema key of the record type.
    pub data_schema: String,
    pub data_link: String,
    /// Positional rows; column order is the record template order.
    pub record_list: Vec<Vec<SimulatedValue>>,
}

/// Field metadata of one record type, without values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaEntry {
    /// Record-type label.
    pub data_schema: String,
    pub attributes: Vec<Attribute>,
}

impl SchemaEntry {
    pub fn column_index(&self) -> ColumnIndex {
        ColumnIndex::new(
            &self.data_schema,
            self.attributes.iter().map(|attribute| attribute.id.as_str()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attribute {
    pub id: String,
    pub display_name: String,
    pub description: String,
}

/// A single synthesized cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SimulatedValue {
    Int(i64),
    Text(String),
    Null,
}

impl SimulatedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SimulatedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SimulatedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SimulatedValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<Option<&str>> for SimulatedValue {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(value) => SimulatedValue::Text(value.to_string()),
            None => SimulatedValue::Null,
        }
    }
}

impl fmt::Display for SimulatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatedValue::Int(value) => write!(f, "{value}"),
            SimulatedValue::Text(value) => f.write_str(value),
            SimulatedValue::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn atlas_collections_flatten_next_to_ids() {
        let mut collections = BTreeMap::new();
        collections.insert(
            "Demographics".to_string(),
            DataBlock {
                data_schema: "bts:Demographics".to_string(),
                data_link: "https://example.org".to_string(),
                record_list: vec![vec![
                    SimulatedValue::Text("HTA1_0".to_string()),
                    SimulatedValue::Int(7),
                    SimulatedValue::Null,
                ]],
            },
        );
        let atlas = Atlas {
            htan_id: "HTA1".to_string(),
            htan_name: "HTAPP Pilot Project".to_string(),
            collections,
        };

        let value = serde_json::to_value(&atlas).expect("serialize atlas");
        assert_eq!(
            value,
            json!({
                "htan_id": "HTA1",
                "htan_name": "HTAPP Pilot Project",
                "Demographics": {
                    "data_schema": "bts:Demographics",
                    "data_link": "https://example.org",
                    "record_list": [["HTA1_0", 7, null]]
                }
            })
        );

        let back: Atlas = serde_json::from_value(value).expect("deserialize atlas");
        assert_eq!(back, atlas);
    }

    #[test]
    fn atlas_schema_types_every_collection() {
        let schema = serde_json::to_value(schemars::schema_for!(GeneratedDataset))
            .expect("serialize schema");
        let atlas = &schema["definitions"]["Atlas"];
        assert_eq!(
            atlas["additionalProperties"],
            json!({"$ref": "#/definitions/DataBlock"})
        );
        assert_eq!(atlas["required"], json!(["htan_id", "htan_name"]));
        assert!(schema["definitions"]["DataBlock"].is_object());
    }

    #[test]
    fn null_values_render_as_null() {
        assert_eq!(SimulatedValue::Null.to_string(), "null");
        assert_eq!(SimulatedValue::from(None).to_string(), "null");
        assert_eq!(SimulatedValue::from(Some("HTA1_0")).as_str(), Some("HTA1_0"));
    }

    #[test]
    fn schema_entry_indexes_attributes() {
        let entry = SchemaEntry {
            data_schema: "Biospecimen".to_string(),
            attributes: vec![
                Attribute {
                    id: "bts:HTANParentID".to_string(),
                    display_name: "HTAN Parent ID".to_string(),
                    description: String::new(),
                },
                Attribute {
                    id: "bts:HTANBiospecimenID".to_string(),
                    display_name: "HTAN Biospecimen ID".to_string(),
                    description: String::new(),
                },
            ],
        };
        let index = entry.column_index();
        assert_eq!(index.schema(), "Biospecimen");
        assert_eq!(index.position("bts:HTANBiospecimenID"), Some(1));
    }
}
