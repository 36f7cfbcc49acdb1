//! Synthetic HTAN dataset generation.
//!
//! Builds the participant/sample lineage of each atlas, synthesizes one row
//! per record and template, and assembles the [`hsim_core::GeneratedDataset`].

pub mod engine;
pub mod errors;
pub mod generators;
pub mod lineage;
pub mod model;

pub use engine::{GenerationEngine, GenerationResult, row_value};
pub use errors::GenerationError;
pub use generators::{DomainTables, ValueSynthesizer};
pub use lineage::{IdentityKind, IdentityRecord, LineageTable};
pub use model::{
    AtlasReport, AtlasSpec, CollectionReport, DEFAULT_DATA_LINK, GenerateOptions,
    GenerationReport,
};
