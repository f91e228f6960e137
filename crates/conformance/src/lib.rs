//! Policy document loading and capability-eval conformance vectors.
//!
//! This crate is the harness around the [`policy`] decision engine. It reads
//! policy and vector documents (JSON, YAML or TOML), checks them through an
//! injected [`DocumentValidator`], and runs every vector case through
//! [`policy::evaluate`], comparing the result with the expected decision.
//! Policy documents under `test-vectors/policy/{valid,invalid}` are run
//! through the validator alone.
//!
//! # Example
//!
//! ```no_run
//! use conformance::{Harness, JsonSchemaValidator};
//!
//! let harness = Harness::new(JsonSchemaValidator::bundled()?);
//! let report = harness.run_suite(".")?;
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! println!("checks={}", report.checks());
//! # Ok::<(), conformance::Error>(())
//! ```

mod discover;
mod document;
mod error;
mod harness;
mod validate;
mod vector;

pub use discover::{
    CAPABILITY_VECTORS_DIR, POLICY_DOCUMENTS_DIR, discover_documents, discover_root,
};
pub use document::{DocumentFormat, load_policy, read_document};
pub use error::{Error, Result};
pub use harness::{CaseFailure, DocumentFailure, Harness, Report};
pub use validate::{
    DocumentKind, DocumentValidator, JsonSchemaValidator, POLICY_SCHEMA, StructuralValidator,
    VECTOR_SCHEMA,
};
pub use vector::{CapabilityCase, CapabilityEvalVector, Expectation, RawCapability};
