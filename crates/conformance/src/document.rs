//! Reading policy and vector documents from disk.
//!
//! All formats are converted into the JSON value model before validation,
//! so validators only ever see one representation.

use crate::validate::{DocumentKind, DocumentValidator};
use crate::{Error, Result};
use policy::Policy;
use serde_json::Value;
use std::path::Path;

/// Document encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Parse `text` into a JSON value.
    pub fn parse(self, text: &str) -> std::result::Result<Value, String> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

/// Read and parse a document, picking the format from its extension.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    format.parse(&text).map_err(|reason| Error::parse(path, reason))
}

/// Load a policy document and check it with `validator` before use.
pub fn load_policy(path: impl AsRef<Path>, validator: &dyn DocumentValidator) -> Result<Policy> {
    let path = path.as_ref();
    let value = read_document(path)?;
    validator
        .validate(DocumentKind::Policy, &value)
        .map_err(|reason| Error::Invalid {
            path: path.to_path_buf(),
            kind: DocumentKind::Policy.name(),
            reason,
        })?;
    tracing::debug!(path = %path.display(), "policy loaded");
    serde_json::from_value(value).map_err(|e| Error::parse(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructuralValidator;
    use std::io::Write;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path(Path::new("a.toml")), Some(DocumentFormat::Toml));
        assert_eq!(DocumentFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("policy")), None);
    }

    #[test]
    fn test_same_policy_in_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(
            &dir,
            "p.json",
            r#"{"version": 1, "capability_ceiling": {"fs": {"read": ["/data"]}, "exec": true}}"#,
        );
        let yaml = write(
            &dir,
            "p.yaml",
            "version: 1\ncapability_ceiling:\n  fs:\n    read: [\"/data\"]\n  exec: true\n",
        );
        let toml = write(
            &dir,
            "p.toml",
            "version = 1\n[capability_ceiling]\nexec = true\n[capability_ceiling.fs]\nread = [\"/data\"]\n",
        );

        let validator = StructuralValidator;
        let from_json = load_policy(&json, &validator).unwrap();
        assert_eq!(load_policy(&yaml, &validator).unwrap(), from_json);
        assert_eq!(load_policy(&toml, &validator).unwrap(), from_json);
        assert!(from_json.capability_ceiling.exec);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "p.ini", "version=1");
        assert!(matches!(
            read_document(&path),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_invalid_policy_is_rejected_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.json", r#"{"version": 1, "capability_ceiling": {"gpu": true}}"#);
        let err = load_policy(&path, &StructuralValidator).unwrap_err();
        match err {
            Error::Invalid { path: p, kind, .. } => {
                assert_eq!(p, path);
                assert_eq!(kind, "policy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
