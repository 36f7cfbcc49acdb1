use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Attribute;
use crate::error::{Error, Result};
use crate::graph::SchemaGraph;
use crate::keys::is_component_key;
use crate::types::FieldDescriptor;

/// How records of a template are laid out against the identifier lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// One record per participant.
    Clinical,
    /// One record per sample, linked to its lineage parent.
    Biospecimen,
    /// One record per sample, linked to a biospecimen.
    Assay,
}

/// A record type selected for generation or verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    /// Schema key of the record-type node (e.g. `bts:Demographics`).
    pub key: String,
    pub kind: TemplateKind,
}

impl TemplateSpec {
    pub fn new(key: impl Into<String>, kind: TemplateKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

/// Ordered field layout of one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordTemplate {
    key: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordTemplate {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field key → column position for rows laid out by this template.
    pub fn column_index(&self) -> ColumnIndex {
        ColumnIndex::new(&self.key, self.fields.iter().map(|field| field.id()))
    }

    /// Field metadata without values, as published in the dataset `schemas` section.
    pub fn front_end_schema(&self) -> Vec<Attribute> {
        self.fields
            .iter()
            .map(|field| Attribute {
                id: field.id().to_string(),
                display_name: field.display_name().to_string(),
                description: field.description().to_string(),
            })
            .collect()
    }
}

/// Project a record-type node into its ordered field template.
///
/// Dependencies are taken in declared order, skipping the component key.
/// Every other reference must resolve; a missing one is an error.
pub fn resolve_template(graph: &SchemaGraph, record_type_key: &str) -> Result<RecordTemplate> {
    let record_type = graph.resolve(record_type_key)?;

    let mut fields = Vec::new();
    for dependency in record_type.dependencies()? {
        if is_component_key(&dependency.id) {
            continue;
        }
        fields.push(resolve_field(graph, &dependency.id)?);
    }

    Ok(RecordTemplate {
        key: record_type.id.clone(),
        fields,
    })
}

/// Resolve a single field node, dereferencing its allowed values to display names.
pub fn resolve_field(graph: &SchemaGraph, key: &str) -> Result<FieldDescriptor> {
    let node = graph.resolve(key)?;
    let display_name = node.display_name()?.trim();
    let description = node.comment()?.trim();

    let mut option_list = Vec::with_capacity(node.allowed_values().len());
    for value_ref in node.allowed_values() {
        let value = graph.resolve(&value_ref.id)?;
        option_list.push(value.display_name()?.to_string());
    }

    Ok(FieldDescriptor::new(
        node.id.clone(),
        display_name,
        description,
        option_list,
    ))
}

/// Field key → column position of a positional record layout.
///
/// Both the synthesizer (which writes rows in template order) and the
/// verifier (which reads them back through the dataset `schemas` section)
/// address columns through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    schema: String,
    positions: BTreeMap<String, usize>,
}

impl ColumnIndex {
    /// Build an index over `columns` in order; the first occurrence of a key wins.
    pub fn new<'a>(schema: &str, columns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut positions = BTreeMap::new();
        for (position, column) in columns.into_iter().enumerate() {
            positions.entry(column.to_string()).or_insert(position);
        }
        Self {
            schema: schema.to_string(),
            positions,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn column_of(&self, column: &str) -> Result<usize> {
        self.position(column).ok_or_else(|| Error::UnknownColumn {
            schema: self.schema.clone(),
            column: column.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InferredType;

    const SOURCE: &str = r#"{
      "@graph": [
        {"@id": "bts:Demographics", "rdfs:label": "Demographics",
         "sms:displayName": "Demographics", "rdfs:comment": "Demographic data",
         "sms:requiresDependency": [
           {"@id": "bts:Component"}, {"@id": "bts:HTANParticipantID"},
           {"@id": "bts:Gender"}, {"@id": "bts:DaysToBirth"}, {"@id": "bts:component"}
         ]},
        {"@id": "bts:HTANParticipantID", "sms:displayName": "HTAN Participant ID ",
         "rdfs:comment": "  HTAN ID associated with a patient  "},
        {"@id": "bts:Gender", "sms:displayName": "Gender", "rdfs:comment": "Gender of the patient",
         "schema:rangeIncludes": [{"@id": "bts:Female"}, {"@id": "bts:Male"}]},
        {"@id": "bts:Female", "sms:displayName": "female"},
        {"@id": "bts:Male", "sms:displayName": "male"},
        {"@id": "bts:DaysToBirth", "sms:displayName": "Days to Birth",
         "rdfs:comment": "Number of days between index date and birth"},
        {"@id": "bts:Broken", "rdfs:label": "Broken",
         "sms:requiresDependency": [{"@id": "bts:Nowhere"}]},
        {"@id": "bts:NoDeps", "rdfs:label": "NoDeps"}
      ]
    }"#;

    fn graph() -> SchemaGraph {
        SchemaGraph::from_json_str(SOURCE).expect("load graph")
    }

    #[test]
    fn resolves_fields_in_declared_order() {
        let template = resolve_template(&graph(), "bts:Demographics").expect("resolve");
        let ids: Vec<&str> = template.fields().iter().map(|field| field.id()).collect();
        assert_eq!(
            ids,
            vec!["bts:HTANParticipantID", "bts:Gender", "bts:DaysToBirth"]
        );

        let participant = &template.fields()[0];
        assert_eq!(participant.display_name(), "HTAN Participant ID");
        assert_eq!(participant.description(), "HTAN ID associated with a patient");
        assert_eq!(participant.inferred_type(), InferredType::String);

        let gender = &template.fields()[1];
        assert_eq!(gender.inferred_type(), InferredType::Enumerated);
        assert_eq!(gender.option_list(), ["female", "male"]);

        assert_eq!(template.fields()[2].inferred_type(), InferredType::Numeric);
    }

    #[test]
    fn resolution_is_idempotent() {
        let graph = graph();
        let first = resolve_template(&graph, "bts:Demographics").expect("first");
        let second = resolve_template(&graph, "bts:Demographics").expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_dependency_is_propagated() {
        let err = resolve_template(&graph(), "bts:Broken").unwrap_err();
        assert!(matches!(err, Error::UnknownSchemaKey(key) if key == "bts:Nowhere"));
    }

    #[test]
    fn record_type_without_dependencies_is_rejected() {
        let err = resolve_template(&graph(), "bts:NoDeps").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute {
                attribute: "sms:requiresDependency",
                ..
            }
        ));
    }

    #[test]
    fn column_index_matches_template_order() {
        let template = resolve_template(&graph(), "bts:Demographics").expect("resolve");
        let index = template.column_index();
        assert_eq!(index.len(), template.len());
        for (position, field) in template.fields().iter().enumerate() {
            assert_eq!(index.position(field.id()), Some(position));
        }
        assert!(matches!(
            index.column_of("bts:Race"),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn front_end_schema_drops_types_and_options() {
        let template = resolve_template(&graph(), "bts:Demographics").expect("resolve");
        let attributes = template.front_end_schema();
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[1].id, "bts:Gender");
        assert_eq!(attributes[1].display_name, "Gender");
    }
}
