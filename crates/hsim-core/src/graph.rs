use std::collections::BTreeMap;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::schema::{SchemaDocument, SchemaNode};

/// Read-only index of the schema graph keyed by node id.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    nodes: BTreeMap<String, SchemaNode>,
    fingerprint: String,
}

impl SchemaGraph {
    /// Load and index a JSON-LD schema document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|err| Error::SchemaLoad(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&source)
    }

    /// Index a JSON-LD schema document held in memory.
    ///
    /// When a key appears more than once the last node wins.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let document: SchemaDocument =
            serde_json::from_str(source).map_err(|err| Error::SchemaLoad(err.to_string()))?;

        let mut nodes = BTreeMap::new();
        for node in document.graph {
            nodes.insert(node.id.clone(), node);
        }

        Ok(Self {
            nodes,
            fingerprint: hex::encode(Sha256::digest(source.as_bytes())),
        })
    }

    /// Look up a node, failing when the key is absent.
    pub fn resolve(&self, key: &str) -> Result<&SchemaNode> {
        self.nodes
            .get(key)
            .ok_or_else(|| Error::UnknownSchemaKey(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.nodes.get(key)
    }

    /// Record-type label (`rdfs:label`) used to name dataset collections.
    pub fn label(&self, key: &str) -> Result<&str> {
        self.resolve(key)?.label()
    }

    /// SHA-256 hex digest of the source document.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
