use rand::Rng;

use hsim_core::keys::{
    BIOSPECIMEN_ID_KEY, PARENT_BIOSPECIMEN_ID_KEY, PARENT_ID_KEY, PARTICIPANT_ID_KEY,
    is_component_key,
};
use hsim_core::{FieldDescriptor, InferredType, RecordTemplate, SimulatedValue};

use crate::errors::GenerationError;

pub mod domain;

pub use domain::{DomainTable, DomainTables, ROOT_PREFIX_LEN, root_index};

/// Upper bound (inclusive) of synthesized numeric values.
pub const NUMERIC_MAX: i64 = 100;
/// Upper bound (exclusive) of the placeholder suffix.
pub const PLACEHOLDER_MAX: u32 = 100_000;

/// Produces one simulated value per template field.
///
/// Randomness always comes from the caller-supplied `rng`, so a seeded
/// generator makes every value reproducible.
#[derive(Debug, Clone, Default)]
pub struct ValueSynthesizer {
    tables: DomainTables,
}

impl ValueSynthesizer {
    pub fn new(tables: DomainTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &DomainTables {
        &self.tables
    }

    /// Simulated value for `field` on the record identified by `self_id`.
    pub fn synthesize(
        &self,
        field: &FieldDescriptor,
        template_key: &str,
        self_id: &str,
        parent_id: Option<&str>,
        rng: &mut impl Rng,
    ) -> Result<SimulatedValue, GenerationError> {
        let value = match field.inferred_type() {
            InferredType::Numeric => SimulatedValue::Int(rng.random_range(0..=NUMERIC_MAX)),
            InferredType::String => {
                synthesize_text(field.id(), template_key, self_id, parent_id, rng)
            }
            InferredType::Enumerated => match self.tables.lookup(field.id(), self_id)? {
                Some(value) => SimulatedValue::Text(value.to_string()),
                None => pick_option(field.option_list(), rng),
            },
        };
        Ok(value)
    }

    /// Values for every field of `template`, in template order.
    pub fn synthesize_row(
        &self,
        template: &RecordTemplate,
        template_key: &str,
        self_id: &str,
        parent_id: Option<&str>,
        rng: &mut impl Rng,
    ) -> Result<Vec<SimulatedValue>, GenerationError> {
        let mut row = Vec::with_capacity(template.len());
        for field in template.fields() {
            row.push(self.synthesize(field, template_key, self_id, parent_id, rng)?);
        }
        Ok(row)
    }
}

fn synthesize_text(
    field_id: &str,
    template_key: &str,
    self_id: &str,
    parent_id: Option<&str>,
    rng: &mut impl Rng,
) -> SimulatedValue {
    match field_id {
        PARTICIPANT_ID_KEY | BIOSPECIMEN_ID_KEY | PARENT_BIOSPECIMEN_ID_KEY => {
            SimulatedValue::Text(self_id.to_string())
        }
        PARENT_ID_KEY => SimulatedValue::from(parent_id),
        id if is_component_key(id) => SimulatedValue::Text(template_key.to_string()),
        _ => SimulatedValue::Text(format!(
            "lorem_ipsum_{}",
            rng.random_range(0..PLACEHOLDER_MAX)
        )),
    }
}

fn pick_option(options: &[String], rng: &mut impl Rng) -> SimulatedValue {
    if options.is_empty() {
        return SimulatedValue::Null;
    }
    let index = rng.random_range(0..options.len());
    SimulatedValue::Text(options[index].clone())
}
