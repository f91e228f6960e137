//! Document validation seam.
//!
//! The decision engine never validates document shape. Callers that read
//! documents construct a [`DocumentValidator`] and pass it in explicitly.

use crate::vector::CapabilityEvalVector;
use crate::{Error, Result};
use jsonschema::Validator;
use policy::Policy;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Policy document schema, relative to the repository root.
pub const POLICY_SCHEMA: &str = "schemas/policy.schema.json";

/// Capability-eval vector schema, relative to the repository root.
pub const VECTOR_SCHEMA: &str = "test-vectors/capability-eval/schema.json";

const BUNDLED_POLICY_SCHEMA: &str = include_str!("../../../schemas/policy.schema.json");
const BUNDLED_VECTOR_SCHEMA: &str =
    include_str!("../../../test-vectors/capability-eval/schema.json");

/// The document types the harness reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Policy,
    CapabilityVector,
}

impl DocumentKind {
    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::Policy => "policy",
            DocumentKind::CapabilityVector => "capability-eval vector",
        }
    }
}

/// Checks that a parsed document conforms to its schema.
pub trait DocumentValidator {
    /// `Err` carries a human-readable reason.
    fn validate(&self, kind: DocumentKind, document: &Value) -> std::result::Result<(), String>;
}

/// Validates documents against the typed model: unknown fields and wrong
/// types are rejected by deserialization, plus a few value constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    fn check_policy(policy: &Policy) -> std::result::Result<(), String> {
        if policy.version == 0 {
            return Err("version must be at least 1".to_string());
        }
        Ok(())
    }
}

impl DocumentValidator for StructuralValidator {
    fn validate(&self, kind: DocumentKind, document: &Value) -> std::result::Result<(), String> {
        match kind {
            DocumentKind::Policy => {
                let policy = Policy::deserialize(document).map_err(|e| e.to_string())?;
                Self::check_policy(&policy)
            }
            DocumentKind::CapabilityVector => {
                let vector =
                    CapabilityEvalVector::deserialize(document).map_err(|e| e.to_string())?;
                if vector.name.trim().is_empty() {
                    return Err("name must not be empty".to_string());
                }
                if vector.cases.is_empty() {
                    return Err("at least one case is required".to_string());
                }
                Self::check_policy(&vector.policy).map_err(|e| format!("policy: {e}"))
            }
        }
    }
}

/// Validates documents against JSON Schemas, then against the typed model.
///
/// A vector's embedded `policy` is checked against the policy schema as
/// well. Documents that pass both schemas still go through
/// [`StructuralValidator`], so nothing the harness later deserializes can
/// slip past on a looser schema.
pub struct JsonSchemaValidator {
    policy: Validator,
    vector: Validator,
}

impl JsonSchemaValidator {
    /// Validator built from the schemas compiled into this crate.
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            policy: compile(POLICY_SCHEMA, BUNDLED_POLICY_SCHEMA)?,
            vector: compile(VECTOR_SCHEMA, BUNDLED_VECTOR_SCHEMA)?,
        })
    }

    /// Validator built from the schema files under `root`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let read = |rel: &str| {
            let path = root.join(rel);
            std::fs::read_to_string(&path).map_err(|e| Error::io(path, e))
        };
        Ok(Self {
            policy: compile(POLICY_SCHEMA, &read(POLICY_SCHEMA)?)?,
            vector: compile(VECTOR_SCHEMA, &read(VECTOR_SCHEMA)?)?,
        })
    }

    fn check(validator: &Validator, document: &Value) -> std::result::Result<(), String> {
        let errors: Vec<String> = validator
            .iter_errors(document)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }
}

fn compile(name: &str, text: &str) -> Result<Validator> {
    let schema: Value = serde_json::from_str(text).map_err(|e| Error::Schema {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    jsonschema::validator_for(&schema).map_err(|e| Error::Schema {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator").finish_non_exhaustive()
    }
}

impl DocumentValidator for JsonSchemaValidator {
    fn validate(&self, kind: DocumentKind, document: &Value) -> std::result::Result<(), String> {
        match kind {
            DocumentKind::Policy => Self::check(&self.policy, document)?,
            DocumentKind::CapabilityVector => {
                Self::check(&self.vector, document)?;
                if let Some(policy) = document.get("policy") {
                    Self::check(&self.policy, policy).map_err(|e| format!("policy: {e}"))?;
                }
            }
        }
        StructuralValidator.validate(kind, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_validation() {
        let v = StructuralValidator;
        assert!(v.validate(DocumentKind::Policy, &json!({"version": 1})).is_ok());
        assert!(v.validate(DocumentKind::Policy, &json!({"version": 0})).is_err());
        assert!(v.validate(DocumentKind::Policy, &json!({})).is_err());
        assert!(v
            .validate(DocumentKind::Policy, &json!({"version": 1, "extra": true}))
            .is_err());
        assert!(v
            .validate(
                DocumentKind::Policy,
                &json!({"version": 1, "capability_ceiling": {"exec": "yes"}})
            )
            .is_err());
    }

    #[test]
    fn test_vector_validation() {
        let v = StructuralValidator;
        let good = json!({
            "name": "fs",
            "policy": {"version": 1},
            "cases": [{"capability": {"kind": "fs.read", "value": "/x"}, "expect": "deny"}]
        });
        assert!(v.validate(DocumentKind::CapabilityVector, &good).is_ok());

        let no_cases = json!({"name": "fs", "policy": {"version": 1}, "cases": []});
        assert!(v.validate(DocumentKind::CapabilityVector, &no_cases).is_err());

        let bad_expect = json!({
            "name": "fs",
            "policy": {"version": 1},
            "cases": [{"capability": {"kind": "fs.read", "value": "/x"}, "expect": "maybe"}]
        });
        assert!(v.validate(DocumentKind::CapabilityVector, &bad_expect).is_err());
    }

    #[test]
    fn test_unknown_kind_is_structurally_valid() {
        let doc = json!({
            "name": "unknown",
            "policy": {"version": 1},
            "cases": [{"capability": {"kind": "gpu.compute", "value": "x"}, "expect": "deny"}]
        });
        assert!(StructuralValidator
            .validate(DocumentKind::CapabilityVector, &doc)
            .is_ok());
    }

    fn repo_root() -> std::path::PathBuf {
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    #[test]
    fn test_schema_rejects_what_the_model_tolerates() {
        let v = JsonSchemaValidator::bundled().unwrap();
        let duplicate_env = json!({"version": 1, "capability_ceiling": {"env": ["HOME", "HOME"]}});
        assert!(StructuralValidator.validate(DocumentKind::Policy, &duplicate_env).is_ok());
        let err = v.validate(DocumentKind::Policy, &duplicate_env).unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn test_schema_checks_embedded_policy() {
        let v = JsonSchemaValidator::bundled().unwrap();
        let doc = json!({
            "name": "fs",
            "policy": {"version": 1, "capability_ceiling": {"net": "https://a.example"}},
            "cases": [{"capability": {"kind": "fs.read", "value": "/x"}, "expect": "deny"}]
        });
        let err = v.validate(DocumentKind::CapabilityVector, &doc).unwrap_err();
        assert!(err.starts_with("policy: "));
    }

    #[test]
    fn test_schema_validator_matches_structural_on_basics() {
        let v = JsonSchemaValidator::bundled().unwrap();
        assert!(v.validate(DocumentKind::Policy, &json!({"version": 1})).is_ok());
        assert!(v.validate(DocumentKind::Policy, &json!({"version": 0})).is_err());
        assert!(v.validate(DocumentKind::Policy, &json!({"version": 1, "extra": 1})).is_err());

        let blank_name = json!({
            "name": "  ",
            "policy": {"version": 1},
            "cases": [{"capability": {"kind": "exec", "value": "true"}, "expect": "deny"}]
        });
        assert!(v.validate(DocumentKind::CapabilityVector, &blank_name).is_err());
    }

    #[test]
    fn test_load_from_repository_files() {
        let v = JsonSchemaValidator::load(repo_root()).unwrap();
        assert!(v.validate(DocumentKind::Policy, &json!({"version": 2})).is_ok());
    }

    #[test]
    fn test_load_reports_missing_and_broken_schemas() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            JsonSchemaValidator::load(dir.path()),
            Err(Error::Io { .. })
        ));

        for rel in [POLICY_SCHEMA, VECTOR_SCHEMA] {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, r#"{"type": 12}"#).unwrap();
        }
        assert!(matches!(
            JsonSchemaValidator::load(dir.path()),
            Err(Error::Schema { .. })
        ));
    }
}
