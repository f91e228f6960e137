//! Runs capability-eval vectors through the decision engine and policy
//! documents through the validator.

use crate::discover::{CAPABILITY_VECTORS_DIR, POLICY_DOCUMENTS_DIR, discover_documents};
use crate::document::read_document;
use crate::validate::{DocumentKind, DocumentValidator};
use crate::vector::{CapabilityEvalVector, Expectation};
use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// A case whose decision differed from the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    pub file: PathBuf,
    pub vector: String,
    pub kind: String,
    pub value: String,
    pub expected: Expectation,
    pub actual: Expectation,
    pub note: Option<String>,
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capability mismatch in {} for {}:{} expected={} actual={}",
            self.file.display(),
            self.kind,
            self.value,
            self.expected,
            self.actual
        )?;
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// A policy document the validator judged differently than its group says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub file: PathBuf,
    /// Whether the document sits in the `valid` group.
    pub expected_valid: bool,
    /// The validator's reason, when it rejected the document.
    pub reason: Option<String>,
}

impl fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(
                f,
                "schema mismatch in {}: expected valid, rejected: {reason}",
                self.file.display()
            ),
            None => write!(
                f,
                "schema mismatch in {}: expected invalid, accepted",
                self.file.display()
            ),
        }
    }
}

/// Outcome of a harness run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Vector documents run.
    pub files: usize,
    /// Vector cases decided.
    pub cases: usize,
    /// Policy documents validated, valid and invalid groups together.
    pub documents: usize,
    pub failures: Vec<CaseFailure>,
    pub document_failures: Vec<DocumentFailure>,
    /// Directories that were asked for but do not exist.
    pub missing: Vec<PathBuf>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.document_failures.is_empty()
    }

    /// Vector documents, cases and policy documents checked.
    pub fn checks(&self) -> usize {
        self.files + self.cases + self.documents
    }
}

/// Vector runner with an injected document validator.
pub struct Harness<V> {
    validator: V,
}

impl<V: DocumentValidator> Harness<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Run every vector document in `dir`.
    ///
    /// Mismatching cases are collected in the report. Unreadable or invalid
    /// documents abort the run.
    pub fn run(&self, dir: impl AsRef<Path>) -> Result<Report> {
        let mut report = Report::default();
        self.run_vectors(dir.as_ref(), &mut report)?;
        Ok(report)
    }

    /// Run both groups found under the repository `root`.
    pub fn run_suite(&self, root: impl AsRef<Path>) -> Result<Report> {
        let root = root.as_ref();
        let mut report = Report::default();
        self.run_vectors(&root.join(CAPABILITY_VECTORS_DIR), &mut report)?;
        self.run_policy_documents(&root.join(POLICY_DOCUMENTS_DIR), &mut report)?;
        Ok(report)
    }

    /// Run every vector document in `dir`, adding to `report`.
    pub fn run_vectors(&self, dir: &Path, report: &mut Report) -> Result<()> {
        if !dir_present(dir, report) {
            return Ok(());
        }
        for file in discover_documents(dir)? {
            self.run_file(&file, report)?;
        }
        Ok(())
    }

    /// Validate the policy documents under `dir/valid` and `dir/invalid`.
    ///
    /// Every document in `valid` must be accepted and every document in
    /// `invalid` rejected. A document that does not parse counts as
    /// rejected. Mismatches are collected in the report.
    pub fn run_policy_documents(&self, dir: &Path, report: &mut Report) -> Result<()> {
        if !dir_present(dir, report) {
            return Ok(());
        }
        for (group, expected_valid) in [("valid", true), ("invalid", false)] {
            for file in discover_documents(dir.join(group))? {
                let verdict = match read_document(&file) {
                    Ok(value) => self.validator.validate(DocumentKind::Policy, &value),
                    Err(e @ Error::Io { .. }) => return Err(e),
                    Err(e) => Err(e.to_string()),
                };
                report.documents += 1;
                tracing::debug!(file = %file.display(), accepted = verdict.is_ok(), "validated policy document");

                let failure = match verdict {
                    Ok(()) if !expected_valid => DocumentFailure {
                        file,
                        expected_valid,
                        reason: None,
                    },
                    Err(reason) if expected_valid => DocumentFailure {
                        file,
                        expected_valid,
                        reason: Some(reason),
                    },
                    _ => continue,
                };
                tracing::warn!("{failure}");
                report.document_failures.push(failure);
            }
        }
        Ok(())
    }

    /// Run a single vector document, adding its results to `report`.
    pub fn run_file(&self, file: &Path, report: &mut Report) -> Result<()> {
        let value = read_document(file)?;
        self.validator
            .validate(DocumentKind::CapabilityVector, &value)
            .map_err(|reason| Error::Invalid {
                path: file.to_path_buf(),
                kind: DocumentKind::CapabilityVector.name(),
                reason,
            })?;
        let vector: CapabilityEvalVector =
            serde_json::from_value(value).map_err(|e| Error::parse(file, e))?;

        tracing::info!(file = %file.display(), vector = %vector.name, cases = vector.cases.len(), "running vector");
        report.files += 1;

        for case in &vector.cases {
            let actual = case.decide(&vector.policy);
            report.cases += 1;
            if actual != case.expect {
                let failure = CaseFailure {
                    file: file.to_path_buf(),
                    vector: vector.name.clone(),
                    kind: case.capability.kind.clone(),
                    value: case.capability.value.clone(),
                    expected: case.expect,
                    actual,
                    note: case.note.clone(),
                };
                tracing::warn!("{failure}");
                report.failures.push(failure);
            }
        }
        Ok(())
    }
}

/// Whether `dir` exists. A missing one is logged and recorded.
fn dir_present(dir: &Path, report: &mut Report) -> bool {
    if dir.is_dir() {
        return true;
    }
    tracing::warn!(dir = %dir.display(), "conformance directory does not exist");
    report.missing.push(dir.to_path_buf());
    false
}
