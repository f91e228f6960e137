//! Capability decision engine.

use crate::path::normalize_guarded_path;
use crate::uri::NetUri;
use crate::{CapabilityKind, CapabilityRequest, Policy, PolicyCeiling};
use std::fmt;

/// Why a request was denied. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denial {
    /// The value failed the per-kind shape check.
    MalformedValue,
    /// The relevant ceiling flag is off or its section is empty.
    NotGranted,
    /// No ceiling entry covers the value.
    OutsideCeiling,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Denial::MalformedValue => "malformed value",
            Denial::NotGranted => "not granted by ceiling",
            Denial::OutsideCeiling => "outside ceiling",
        })
    }
}

/// Result of a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: Denial },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// `"allow"` or `"deny"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny { .. } => "deny",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Deny { reason } => write!(f, "deny ({reason})"),
        }
    }
}

/// Decide whether `policy` permits `request`.
pub fn evaluate(policy: &Policy, request: &CapabilityRequest) -> bool {
    policy.capability_ceiling.permits(request)
}

/// Decide whether `policy` permits `request`, keeping the denial reason.
pub fn explain(policy: &Policy, request: &CapabilityRequest) -> Decision {
    policy.capability_ceiling.check(request)
}

impl Policy {
    /// Check if a capability request is allowed.
    pub fn check(&self, request: &CapabilityRequest) -> Decision {
        self.capability_ceiling.check(request)
    }
}

impl PolicyCeiling {
    /// Whether this ceiling permits `request`.
    pub fn permits(&self, request: &CapabilityRequest) -> bool {
        self.check(request).is_allowed()
    }

    /// Check `request` against this ceiling.
    pub fn check(&self, request: &CapabilityRequest) -> Decision {
        let decision = match self.assess(request) {
            Ok(()) => Decision::Allow,
            Err(reason) => Decision::Deny { reason },
        };
        if let Decision::Deny { reason } = decision {
            tracing::debug!(
                kind = %request.kind,
                value = %request.value,
                %reason,
                "capability denied"
            );
        }
        decision
    }

    fn assess(&self, request: &CapabilityRequest) -> Result<(), Denial> {
        let value = request.value.as_str();
        match request.kind {
            CapabilityKind::Exec => {
                require(value == "true")?;
                flag(self.exec)
            }
            CapabilityKind::ExecSafe => {
                require(!value.is_empty())?;
                flag(self.exec)
            }
            CapabilityKind::TimeNow => {
                require(!value.is_empty())?;
                flag(self.time)
            }
            CapabilityKind::RandomBytes => {
                require(!value.is_empty())?;
                flag(self.random)
            }
            CapabilityKind::Env => {
                require(is_valid_env_name(value))?;
                if self.env.is_empty() {
                    return Err(Denial::NotGranted);
                }
                found(self.env.contains(value))
            }
            CapabilityKind::NetHttp => {
                let requested = NetUri::parse(value).ok_or(Denial::MalformedValue)?;
                granted(&self.net, |entry| {
                    // unusable entries are skipped, never fatal
                    NetUri::parse(entry).is_some_and(|allowed| requested.within(&allowed))
                })
            }
            CapabilityKind::FsRead => fs_granted(&self.fs.read, value),
            CapabilityKind::FsWrite => fs_granted(&self.fs.write, value),
            CapabilityKind::KvRead => identifier_granted(&self.kv.read, value),
            CapabilityKind::KvWrite => identifier_granted(&self.kv.write, value),
            CapabilityKind::QueuePublish => identifier_granted(&self.queue.publish, value),
            CapabilityKind::QueueConsume => identifier_granted(&self.queue.consume, value),
        }
    }
}

fn require(valid: bool) -> Result<(), Denial> {
    if valid { Ok(()) } else { Err(Denial::MalformedValue) }
}

fn flag(enabled: bool) -> Result<(), Denial> {
    if enabled { Ok(()) } else { Err(Denial::NotGranted) }
}

fn found(matched: bool) -> Result<(), Denial> {
    if matched { Ok(()) } else { Err(Denial::OutsideCeiling) }
}

/// Any entry matching grants access; an empty list grants nothing.
fn granted(entries: &[String], matches: impl Fn(&str) -> bool) -> Result<(), Denial> {
    if entries.is_empty() {
        return Err(Denial::NotGranted);
    }
    found(entries.iter().any(|entry| matches(entry)))
}

fn fs_granted(prefixes: &[String], value: &str) -> Result<(), Denial> {
    let requested = normalize_guarded_path(value).ok_or(Denial::MalformedValue)?;
    granted(prefixes, |entry| {
        normalize_guarded_path(entry).is_some_and(|prefix| prefix.contains(&requested))
    })
}

/// `"*"` matches any non-empty identifier; otherwise exact match.
fn identifier_granted(allowed: &[String], value: &str) -> Result<(), Denial> {
    require(!value.is_empty())?;
    granted(allowed, |entry| entry == "*" || entry == value)
}

/// `^[A-Z_][A-Z0-9_]*$`
pub(crate) fn is_valid_env_name(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_ascii_uppercase())
        && chars.all(|c| c == '_' || c.is_ascii_uppercase() || c.is_ascii_digit())
}
