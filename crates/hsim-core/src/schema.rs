use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level JSON-LD document holding the schema graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "@graph")]
    pub graph: Vec<SchemaNode>,
}

/// Reference to another node of the graph (`{"@id": "bts:Gender"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    #[serde(rename = "@id")]
    pub id: String,
}

/// One node of the external schema graph.
///
/// Every attribute besides the key is optional in the source document; the
/// accessors below turn an absent attribute into [`Error::MissingAttribute`]
/// at the point where it is actually needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "rdfs:label", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        rename = "sms:displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(rename = "rdfs:comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Allowed-value references for enumerated fields.
    #[serde(
        rename = "schema:rangeIncludes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub range_includes: Option<Vec<NodeRef>>,
    /// Field references of a record-type node, in declared order.
    #[serde(
        rename = "sms:requiresDependency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub requires_dependency: Option<Vec<NodeRef>>,
}

impl SchemaNode {
    pub fn label(&self) -> Result<&str> {
        self.label
            .as_deref()
            .ok_or_else(|| self.missing("rdfs:label"))
    }

    pub fn display_name(&self) -> Result<&str> {
        self.display_name
            .as_deref()
            .ok_or_else(|| self.missing("sms:displayName"))
    }

    pub fn comment(&self) -> Result<&str> {
        self.comment
            .as_deref()
            .ok_or_else(|| self.missing("rdfs:comment"))
    }

    pub fn dependencies(&self) -> Result<&[NodeRef]> {
        self.requires_dependency
            .as_deref()
            .ok_or_else(|| self.missing("sms:requiresDependency"))
    }

    /// Allowed-value references; a node without any is simply not enumerated.
    pub fn allowed_values(&self) -> &[NodeRef] {
        self.range_includes.as_deref().unwrap_or(&[])
    }

    fn missing(&self, attribute: &'static str) -> Error {
        Error::MissingAttribute {
            key: self.id.clone(),
            attribute,
        }
    }
}
