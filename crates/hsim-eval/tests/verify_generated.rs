use std::path::PathBuf;

use hsim_core::keys::{PARENT_BIOSPECIMEN_ID_KEY, PARENT_ID_KEY};
use hsim_core::{GeneratedDataset, SchemaGraph, SimulatedValue};
use hsim_eval::{
    EvalError, IntegrityVerifier, VerifyOptions, default_collections, parse_dataset,
    resolve_collections, validate_dataset_json, verify,
};
use hsim_generate::{GenerateOptions, GenerationEngine};

fn load_fixture() -> SchemaGraph {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/schema/htan_mini.jsonld");
    SchemaGraph::load(&path).unwrap_or_else(|err| panic!("load {}: {err}", path.display()))
}

fn generated() -> GeneratedDataset {
    let options = GenerateOptions {
        seed: 2024,
        participants: 4,
        samples_per_participant: 5,
        ..GenerateOptions::default()
    };
    GenerationEngine::new(options)
        .run(&load_fixture())
        .expect("run generation")
        .dataset
}

fn set_cell(
    dataset: &mut GeneratedDataset,
    atlas: usize,
    label: &str,
    row: usize,
    field: &str,
    value: &str,
) {
    let position = dataset
        .schema(label)
        .expect("schema entry")
        .column_index()
        .column_of(field)
        .expect("column");
    dataset.atlases[atlas]
        .collections
        .get_mut(label)
        .expect("collection")
        .record_list[row][position] = SimulatedValue::Text(value.to_string());
}

#[test]
fn generated_dataset_passes_structural_validation() {
    let dataset = generated();
    let document = serde_json::to_value(&dataset).expect("serialize");
    let violations = validate_dataset_json(&document).expect("validate");
    assert!(violations.is_empty(), "{violations:?}");

    let reparsed = parse_dataset(&document).expect("parse");
    assert_eq!(reparsed, dataset);
}

#[test]
fn generated_dataset_has_no_integrity_errors() {
    let dataset = generated();
    let verifier = IntegrityVerifier::new(&dataset, &default_collections()).expect("verify");
    assert!(verifier.error_list().is_empty(), "{:?}", verifier.error_list());
    assert!(verifier.warnings().is_empty());

    let report = verifier.report();
    assert_eq!(report.assay_references.records_checked, 2 * 4 * 5);
    assert_eq!(report.biospecimen_parents.records_checked, 2 * 4 * 5);
}

#[test]
fn one_bad_assay_reference_yields_one_error() {
    let mut dataset = generated();
    set_cell(&mut dataset, 0, "ScRNA-seqLevel1", 3, PARENT_BIOSPECIMEN_ID_KEY, "XYZ");

    let verifier = IntegrityVerifier::new(&dataset, &default_collections()).expect("verify");
    assert_eq!(
        verifier.error_list(),
        vec![
            "Within ScRNA-seqLevel1, we have bts:HTANParentBiospecimenID:XYZ, but this ID does not exist within the Biospecimen list."
                .to_string()
        ]
    );
}

#[test]
fn bad_biospecimen_parent_uses_combined_message() {
    let mut dataset = generated();
    set_cell(&mut dataset, 1, "Biospecimen", 0, PARENT_ID_KEY, "HTA1_0");

    let verifier = IntegrityVerifier::new(&dataset, &default_collections()).expect("verify");
    assert_eq!(
        verifier.error_list(),
        vec![
            "Within Biospecimen, we have bts:HTANParentID:HTA1_0, but this ID does not exist within the Biospecimen or Demographics list."
                .to_string()
        ]
    );
    assert_eq!(verifier.violations()[0].atlas, "HTA2");
}

#[test]
fn every_violation_is_collected() {
    let mut dataset = generated();
    set_cell(&mut dataset, 0, "ScRNA-seqLevel1", 0, PARENT_BIOSPECIMEN_ID_KEY, "A");
    set_cell(&mut dataset, 1, "ScRNA-seqLevel1", 7, PARENT_BIOSPECIMEN_ID_KEY, "B");
    set_cell(&mut dataset, 0, "Biospecimen", 2, PARENT_ID_KEY, "C");
    set_cell(&mut dataset, 1, "Biospecimen", 9, PARENT_ID_KEY, "D");

    let verifier = IntegrityVerifier::new(&dataset, &default_collections()).expect("verify");
    let values: Vec<String> = verifier
        .violations()
        .iter()
        .map(|violation| violation.value.to_string())
        .collect();
    assert_eq!(values, vec!["A", "B", "C", "D"]);
}

#[test]
fn dropped_biospecimen_collection_fails_strict_verification() {
    let mut dataset = generated();
    dataset.atlases[0].collections.remove("Biospecimen");

    let verifier = IntegrityVerifier::new(&dataset, &default_collections()).expect("verify");
    assert_eq!(verifier.error_list().len(), 4 * 5);
    assert!(verifier.violations().iter().all(|v| v.atlas == "HTA1"));
    assert_eq!(verifier.warnings().len(), 1);

    let strict = VerifyOptions {
        strict: true,
        ..VerifyOptions::default()
    };
    let err = verify(&dataset, &default_collections(), &strict).unwrap_err();
    assert!(matches!(err, EvalError::Violations(20)));
}

#[test]
fn collections_resolve_from_configured_templates() {
    let dataset = generated();
    let collections = resolve_collections(&dataset, &GenerateOptions::default().templates);
    assert_eq!(collections, default_collections());
}
