use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use hsim_core::{
    Atlas, DataBlock, GeneratedDataset, RecordTemplate, SchemaEntry, SchemaGraph, SimulatedValue,
    TemplateKind, TemplateSpec, resolve_template,
};

use crate::errors::GenerationError;
use crate::generators::ValueSynthesizer;
use crate::lineage::LineageTable;
use crate::model::{AtlasReport, AtlasSpec, CollectionReport, GenerateOptions, GenerationReport};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: GeneratedDataset,
    pub report: GenerationReport,
}

/// Entry point for assembling a dataset from a schema graph.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
    synthesizer: ValueSynthesizer,
}

/// A configured template resolved against the graph.
#[derive(Debug)]
struct PlannedCollection {
    label: String,
    kind: TemplateKind,
    template: RecordTemplate,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            synthesizer: ValueSynthesizer::default(),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: ValueSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate every configured atlas. Any error aborts the whole run.
    pub fn run(&self, graph: &SchemaGraph) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        self.options.validate()?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(
            run_id.clone(),
            graph.fingerprint().to_string(),
            self.options.seed,
        );

        info!(
            run_id = %run_id,
            atlases = self.options.atlases.len(),
            templates = self.options.templates.len(),
            seed = self.options.seed,
            fingerprint = %graph.fingerprint(),
            "generation started"
        );

        let (planned, duplicates) = plan_collections(graph, &self.options.templates)?;
        report.duplicate_templates = duplicates;

        let schemas = planned
            .iter()
            .map(|collection| SchemaEntry {
                data_schema: collection.label.clone(),
                attributes: collection.template.front_end_schema(),
            })
            .collect();

        let mut atlases = Vec::with_capacity(self.options.atlases.len());
        for spec in &self.options.atlases {
            let (atlas, atlas_report) = self.generate_atlas(spec, &planned)?;
            report.record_atlas(atlas_report);
            atlases.push(atlas);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            atlases = atlases.len(),
            rows = report.rows_total,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            dataset: GeneratedDataset { atlases, schemas },
            report,
        })
    }

    fn generate_atlas(
        &self,
        spec: &AtlasSpec,
        planned: &[PlannedCollection],
    ) -> Result<(Atlas, AtlasReport), GenerationError> {
        let atlas_start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(self.options.seed, &spec.htan_id));
        let lineage = LineageTable::generate(
            &spec.htan_id,
            self.options.participants,
            self.options.samples_per_participant,
        );
        let participants = lineage.participant_ids();
        let samples = lineage.sample_ids();

        info!(
            atlas = %spec.htan_id,
            participants = participants.len(),
            samples = samples.len(),
            "generating atlas"
        );

        let mut collections = BTreeMap::new();
        let mut collection_reports = Vec::with_capacity(planned.len());
        for collection in planned {
            let template_key = collection.template.key();
            let mut record_list = Vec::new();
            match collection.kind {
                TemplateKind::Clinical => {
                    for participant in &participants {
                        record_list.push(self.synthesizer.synthesize_row(
                            &collection.template,
                            template_key,
                            participant,
                            None,
                            &mut rng,
                        )?);
                    }
                }
                TemplateKind::Biospecimen | TemplateKind::Assay => {
                    for sample in &samples {
                        record_list.push(self.synthesizer.synthesize_row(
                            &collection.template,
                            template_key,
                            sample,
                            lineage.parent_of(sample),
                            &mut rng,
                        )?);
                    }
                }
            }

            debug!(
                atlas = %spec.htan_id,
                collection = %collection.label,
                rows = record_list.len(),
                "collection generated"
            );
            collection_reports.push(CollectionReport {
                label: collection.label.clone(),
                data_schema: template_key.to_string(),
                kind: collection.kind,
                rows: record_list.len() as u64,
            });
            collections.insert(
                collection.label.clone(),
                DataBlock {
                    data_schema: template_key.to_string(),
                    data_link: self.options.data_link.clone(),
                    record_list,
                },
            );
        }

        info!(
            atlas = %spec.htan_id,
            collections = collections.len(),
            duration_ms = atlas_start.elapsed().as_millis() as u64,
            "atlas generated"
        );

        let atlas = Atlas {
            htan_id: spec.htan_id.clone(),
            htan_name: spec.htan_name.clone(),
            collections,
        };
        let atlas_report = AtlasReport {
            htan_id: spec.htan_id.clone(),
            participants: participants.len() as u64,
            samples: samples.len() as u64,
            collections: collection_reports,
        };
        Ok((atlas, atlas_report))
    }
}

/// Resolve configured templates once, collapsing repeated keys.
fn plan_collections(
    graph: &SchemaGraph,
    templates: &[TemplateSpec],
) -> Result<(Vec<PlannedCollection>, Vec<String>), GenerationError> {
    let mut planned: Vec<PlannedCollection> = Vec::with_capacity(templates.len());
    let mut seen_keys = HashSet::new();
    let mut duplicates = Vec::new();

    for spec in templates {
        if !seen_keys.insert(spec.key.as_str()) {
            warn!(template = %spec.key, "duplicate template ignored");
            duplicates.push(spec.key.clone());
            continue;
        }

        let label = graph.label(&spec.key)?.to_string();
        if let Some(existing) = planned.iter().find(|c| c.label == label) {
            return Err(GenerationError::InvalidOptions(format!(
                "templates '{}' and '{}' share the label '{}'",
                existing.template.key(),
                spec.key,
                label
            )));
        }

        let template = resolve_template(graph, &spec.key)?;
        debug!(template = %spec.key, fields = template.len(), "template resolved");
        planned.push(PlannedCollection {
            label,
            kind: spec.kind,
            template,
        });
    }

    Ok((planned, duplicates))
}

/// Cells of `row` addressed by field key through the template column index.
pub fn row_value<'a>(
    template: &RecordTemplate,
    row: &'a [SimulatedValue],
    field_key: &str,
) -> Result<Option<&'a SimulatedValue>, GenerationError> {
    let position = template.column_index().column_of(field_key)?;
    Ok(row.get(position))
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
