//! Capability evaluation test vectors.

use policy::{CapabilityRequest, Policy, evaluate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A policy and the decisions expected for a list of requests under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityEvalVector {
    pub name: String,
    pub policy: Policy,
    pub cases: Vec<CapabilityCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityCase {
    pub capability: RawCapability,
    pub expect: Expectation,
    #[serde(default)]
    pub note: Option<String>,
}

/// A request as written in a document. The kind is kept as a string so that
/// vectors can exercise kinds outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCapability {
    pub kind: String,
    pub value: String,
}

impl RawCapability {
    /// The typed request, or `None` for an unknown kind.
    pub fn to_request(&self) -> Option<CapabilityRequest> {
        CapabilityRequest::parse(&self.kind, self.value.clone()).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Allow,
    Deny,
}

impl Expectation {
    pub fn as_str(self) -> &'static str {
        match self {
            Expectation::Allow => "allow",
            Expectation::Deny => "deny",
        }
    }
}

impl From<bool> for Expectation {
    fn from(allowed: bool) -> Self {
        if allowed { Expectation::Allow } else { Expectation::Deny }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CapabilityCase {
    /// The decision `policy` actually renders for this case.
    pub fn decide(&self, policy: &Policy) -> Expectation {
        match self.capability.to_request() {
            Some(request) => evaluate(policy, &request).into(),
            None => {
                tracing::debug!(kind = %self.capability.kind, "unknown capability kind, denying");
                Expectation::Deny
            }
        }
    }
}
