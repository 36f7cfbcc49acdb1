use std::collections::HashSet;

use tracing::{info, warn};

use hsim_core::keys::{
    BIOSPECIMEN_COLLECTION, BIOSPECIMEN_ID_KEY, DEMOGRAPHICS_COLLECTION,
    PARENT_BIOSPECIMEN_ID_KEY, PARENT_ID_KEY, PARTICIPANT_ID_KEY,
};
use hsim_core::{Atlas, ColumnIndex, GeneratedDataset, SimulatedValue, TemplateKind};

use crate::errors::EvalError;
use crate::model::{
    CollectionRef, IntegrityReport, PhaseStats, VerifyOptions, Violation, ViolationCode,
    WarningItem,
};

/// Referential-integrity scan of a generated dataset.
///
/// Both phases run at construction; the verifier then only exposes what it
/// found. Violations are data, so a dataset full of broken references still
/// yields `Ok`.
#[derive(Debug, Clone)]
pub struct IntegrityVerifier {
    report: IntegrityReport,
}

impl IntegrityVerifier {
    /// Scan `dataset`. Assay collections are taken from `collections`.
    ///
    /// Fails only when the `schemas` section cannot locate a referenced column.
    pub fn new(
        dataset: &GeneratedDataset,
        collections: &[CollectionRef],
    ) -> Result<Self, EvalError> {
        let biospecimen_index = column_index(dataset, BIOSPECIMEN_COLLECTION)?;
        let biospecimen_id = column(&biospecimen_index, BIOSPECIMEN_ID_KEY)?;
        let parent_id = column(&biospecimen_index, PARENT_ID_KEY)?;
        let demographics_index = column_index(dataset, DEMOGRAPHICS_COLLECTION)?;
        let participant_id = column(&demographics_index, PARTICIPANT_ID_KEY)?;

        let mut assays = Vec::new();
        for collection in collections.iter().filter(|c| c.kind == TemplateKind::Assay) {
            let assay_index = column_index(dataset, &collection.label)?;
            let parent_column = column(&assay_index, PARENT_BIOSPECIMEN_ID_KEY)?;
            assays.push((collection.label.as_str(), parent_column));
        }

        let mut scan = Scan::default();
        let known: Vec<KnownIds> = dataset
            .atlases
            .iter()
            .map(|atlas| scan.known_ids(atlas, biospecimen_id, participant_id))
            .collect();

        for (label, parent_column) in &assays {
            for (atlas, ids) in dataset.atlases.iter().zip(&known) {
                scan.check_assay(atlas, label, *parent_column, ids);
            }
        }
        for (atlas, ids) in dataset.atlases.iter().zip(&known) {
            scan.check_biospecimen_parents(atlas, parent_id, ids);
        }

        let report = scan.report;
        info!(
            atlases = dataset.atlases.len(),
            assay_records = report.assay_references.records_checked,
            biospecimen_records = report.biospecimen_parents.records_checked,
            violations = report.violations.len(),
            warnings = report.warnings.len(),
            "integrity scan completed"
        );
        Ok(Self { report })
    }

    /// Every violation message, phase 1 first, then phase 2.
    pub fn error_list(&self) -> Vec<String> {
        self.report.error_list()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.report.violations
    }

    pub fn warnings(&self) -> &[WarningItem] {
        &self.report.warnings
    }

    pub fn report(&self) -> &IntegrityReport {
        &self.report
    }

    pub fn into_report(self) -> IntegrityReport {
        self.report
    }
}

/// Run the integrity scan and apply `options.strict`.
pub fn verify(
    dataset: &GeneratedDataset,
    collections: &[CollectionRef],
    options: &VerifyOptions,
) -> Result<IntegrityReport, EvalError> {
    let report = IntegrityVerifier::new(dataset, collections)?.into_report();
    if options.strict && !report.is_clean() {
        return Err(EvalError::Violations(report.violation_count()));
    }
    Ok(report)
}

/// Identifiers listed by one atlas. A missing collection contributes none.
#[derive(Debug, Default)]
struct KnownIds {
    biospecimens: HashSet<SimulatedValue>,
    participants: HashSet<SimulatedValue>,
}

impl KnownIds {
    fn is_parent(&self, value: &SimulatedValue) -> bool {
        self.participants.contains(value) || self.biospecimens.contains(value)
    }
}

#[derive(Debug, Default)]
struct Scan {
    report: IntegrityReport,
}

impl Scan {
    fn known_ids(
        &mut self,
        atlas: &Atlas,
        biospecimen_id: usize,
        participant_id: usize,
    ) -> KnownIds {
        let mut known = KnownIds::default();
        if let Some(rows) = self.block(atlas, BIOSPECIMEN_COLLECTION) {
            self.collect_ids(
                atlas,
                BIOSPECIMEN_COLLECTION,
                rows,
                biospecimen_id,
                &mut known.biospecimens,
            );
        }
        if let Some(rows) = self.block(atlas, DEMOGRAPHICS_COLLECTION) {
            self.collect_ids(
                atlas,
                DEMOGRAPHICS_COLLECTION,
                rows,
                participant_id,
                &mut known.participants,
            );
        }
        known
    }

    fn check_assay(&mut self, atlas: &Atlas, label: &str, parent_column: usize, known: &KnownIds) {
        let Some(assay) = self.block(atlas, label) else {
            return;
        };

        let mut stats = PhaseStats::default();
        for (row_index, row) in assay.iter().enumerate() {
            let Some(value) = self.cell(atlas, label, row_index, row, parent_column) else {
                continue;
            };
            stats.records_checked += 1;
            if !known.biospecimens.contains(value) {
                stats.violations += 1;
                self.report.violations.push(Violation {
                    code: ViolationCode::UnknownBiospecimen,
                    atlas: atlas.htan_id.clone(),
                    collection: label.to_string(),
                    field: PARENT_BIOSPECIMEN_ID_KEY.to_string(),
                    value: value.clone(),
                    row_index: row_index as u64,
                });
            }
        }
        add_stats(&mut self.report.assay_references, stats);
    }

    fn check_biospecimen_parents(&mut self, atlas: &Atlas, parent_id: usize, known: &KnownIds) {
        // Already reported as missing while collecting ids.
        let Some(biospecimen) = atlas.collection(BIOSPECIMEN_COLLECTION) else {
            return;
        };

        let mut stats = PhaseStats::default();
        for (row_index, row) in biospecimen.record_list.iter().enumerate() {
            let Some(value) = self.cell(atlas, BIOSPECIMEN_COLLECTION, row_index, row, parent_id)
            else {
                continue;
            };
            stats.records_checked += 1;
            if !known.is_parent(value) {
                stats.violations += 1;
                self.report.violations.push(Violation {
                    code: ViolationCode::UnknownParent,
                    atlas: atlas.htan_id.clone(),
                    collection: BIOSPECIMEN_COLLECTION.to_string(),
                    field: PARENT_ID_KEY.to_string(),
                    value: value.clone(),
                    row_index: row_index as u64,
                });
            }
        }
        add_stats(&mut self.report.biospecimen_parents, stats);
    }

    fn block<'a>(&mut self, atlas: &'a Atlas, label: &str) -> Option<&'a [Vec<SimulatedValue>]> {
        match atlas.collection(label) {
            Some(block) => Some(block.record_list.as_slice()),
            None => {
                warn!(atlas = %atlas.htan_id, collection = %label, "collection missing");
                self.push_warning(WarningItem::new(
                    "missing_collection",
                    format!("{}/{}", atlas.htan_id, label),
                    format!("atlas '{}' has no '{}' collection", atlas.htan_id, label),
                ));
                None
            }
        }
    }

    fn cell<'a>(
        &mut self,
        atlas: &Atlas,
        label: &str,
        row_index: usize,
        row: &'a [SimulatedValue],
        position: usize,
    ) -> Option<&'a SimulatedValue> {
        let value = row.get(position);
        if value.is_none() {
            warn!(atlas = %atlas.htan_id, collection = %label, row_index, "short row");
            self.push_warning(WarningItem::new(
                "short_row",
                format!("{}/{}/{}", atlas.htan_id, label, row_index),
                format!(
                    "row has {} value(s), column {} expected",
                    row.len(),
                    position
                ),
            ));
        }
        value
    }

    /// Record a warning once per code and path.
    fn push_warning(&mut self, warning: WarningItem) {
        let seen = self
            .report
            .warnings
            .iter()
            .any(|existing| existing.code == warning.code && existing.path == warning.path);
        if !seen {
            self.report.warnings.push(warning);
        }
    }

    /// Null cells are never valid targets, so they are left out.
    fn collect_ids(
        &mut self,
        atlas: &Atlas,
        label: &str,
        rows: &[Vec<SimulatedValue>],
        position: usize,
        known: &mut HashSet<SimulatedValue>,
    ) {
        for (row_index, row) in rows.iter().enumerate() {
            if let Some(value) = self.cell(atlas, label, row_index, row, position) {
                if !value.is_null() {
                    known.insert(value.clone());
                }
            }
        }
    }
}

fn add_stats(total: &mut PhaseStats, stats: PhaseStats) {
    total.records_checked += stats.records_checked;
    total.violations += stats.violations;
}

fn column_index(dataset: &GeneratedDataset, label: &str) -> Result<ColumnIndex, EvalError> {
    dataset
        .schema(label)
        .map(|entry| entry.column_index())
        .ok_or_else(|| EvalError::InvalidDataset(format!("no schema entry for '{label}'")))
}

fn column(index: &ColumnIndex, field_key: &str) -> Result<usize, EvalError> {
    index
        .column_of(field_key)
        .map_err(|err| EvalError::InvalidDataset(err.to_string()))
}
