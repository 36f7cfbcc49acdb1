//! Core contracts and helpers for hsim.
//!
//! This crate indexes the external JSON-LD schema graph, resolves record-type
//! templates with inferred field types, and defines the generated dataset
//! document shared by the generator and the integrity verifier.

pub mod dataset;
pub mod error;
pub mod graph;
pub mod keys;
pub mod schema;
pub mod template;
pub mod types;

pub use dataset::{Atlas, Attribute, DataBlock, GeneratedDataset, SchemaEntry, SimulatedValue};
pub use error::{Error, Result};
pub use graph::SchemaGraph;
pub use schema::{NodeRef, SchemaDocument, SchemaNode};
pub use template::{
    ColumnIndex, RecordTemplate, TemplateKind, TemplateSpec, resolve_field, resolve_template,
};
pub use types::{FieldDescriptor, InferredType, infer_type};
