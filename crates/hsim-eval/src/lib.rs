//! Verification of generated HTAN datasets.
//!
//! Structural validation checks a dataset document against the JSON Schema
//! of [`hsim_core::GeneratedDataset`]; the integrity verifier then checks
//! that every parent reference points at an identifier that exists.

pub mod engine;
pub mod errors;
pub mod model;
pub mod report;
pub mod schema;

pub use engine::{IntegrityVerifier, verify};
pub use errors::EvalError;
pub use model::{
    CollectionRef, IntegrityReport, PhaseStats, VerifyOptions, Violation, ViolationCode,
    WarningItem, default_collections, resolve_collections,
};
pub use report::render_report;
pub use schema::{SchemaViolation, dataset_json_schema, parse_dataset, validate_dataset_json};
