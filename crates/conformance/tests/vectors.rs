//! Runs the bundled capability-eval vectors and policy documents.

use conformance::{
    CAPABILITY_VECTORS_DIR, DocumentFailure, Harness, JsonSchemaValidator, POLICY_DOCUMENTS_DIR,
    Report, StructuralValidator, discover_documents,
};
use std::path::PathBuf;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixtures() -> PathBuf {
    repo_root().join(CAPABILITY_VECTORS_DIR)
}

#[test]
fn bundled_suite_passes() {
    let harness = Harness::new(JsonSchemaValidator::bundled().unwrap());
    let report = harness.run_suite(repo_root()).unwrap();
    for failure in &report.failures {
        eprintln!("{failure}");
    }
    for failure in &report.document_failures {
        eprintln!("{failure}");
    }
    assert!(report.is_success());
    assert!(report.missing.is_empty());
    assert_eq!(report.files, 6);
    assert_eq!(report.cases, 45);
    assert_eq!(report.documents, 9);
    assert_eq!(report.checks(), 60);
}

#[test]
fn bundled_vectors_pass_structurally() {
    let report = Harness::new(StructuralValidator).run(fixtures()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.checks(), 51);
}

#[test]
fn schema_catches_what_typed_model_accepts() {
    let mut report = Report::default();
    Harness::new(StructuralValidator)
        .run_policy_documents(&repo_root().join(POLICY_DOCUMENTS_DIR), &mut report)
        .unwrap();
    let [DocumentFailure {
        file,
        expected_valid,
        reason,
    }] = report.document_failures.as_slice()
    else {
        panic!("expected one failure, got {:?}", report.document_failures);
    };
    assert!(file.ends_with("duplicate-env.json"));
    assert!(!expected_valid);
    assert!(reason.is_none());
}

#[test]
fn schema_files_on_disk_match_bundled() {
    let harness = Harness::new(JsonSchemaValidator::load(repo_root()).unwrap());
    let report = harness.run_suite(repo_root()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.checks(), 60);
}

#[test]
fn schema_file_is_not_a_vector() {
    let docs = discover_documents(fixtures()).unwrap();
    assert!(docs.iter().all(|p| !p.ends_with("schema.json")));
    assert!(docs.iter().any(|p| p.ends_with("fs-root.yaml")));
}

#[test]
fn repeated_runs_agree() {
    let harness = Harness::new(JsonSchemaValidator::bundled().unwrap());
    let first = harness.run_suite(repo_root()).unwrap();
    let second = harness.run_suite(repo_root()).unwrap();
    assert_eq!(first.checks(), second.checks());
    assert_eq!(first.failures, second.failures);
    assert_eq!(first.document_failures, second.document_failures);
}
