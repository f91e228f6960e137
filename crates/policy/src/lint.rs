//! Authoring checks for policy ceilings.
//!
//! Evaluation silently skips entries that can never match. This module finds
//! them so policy authors can be told at load time. It never changes a
//! decision.

use crate::engine::is_valid_env_name;
use crate::path::normalize_guarded_path;
use crate::uri::NetUri;
use crate::{Policy, PolicyCeiling};
use std::fmt;

/// A ceiling entry that can never grant anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    /// Dotted location of the entry, e.g. `capability_ceiling.fs.read[1]`.
    pub field: String,
    pub entry: String,
    pub problem: LintProblem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintProblem {
    /// `"*"` where only prefixes are accepted.
    WildcardNotSupported,
    /// Path is relative, contains `..`, NUL, a backslash or an encoded byte.
    UnusablePath,
    /// URI does not parse, has no authority, or has an unusable path.
    UnusableUri,
    /// URI prefix carries a query string.
    QueryInPrefix,
    /// URI prefix carries a fragment.
    FragmentInPrefix,
    /// Not of the form `[A-Z_][A-Z0-9_]*`.
    InvalidEnvName,
    /// Empty namespace or topic identifier.
    EmptyIdentifier,
}

impl fmt::Display for LintProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintProblem::WildcardNotSupported => "wildcard is not supported here, use a prefix",
            LintProblem::UnusablePath => "path cannot be canonicalized",
            LintProblem::UnusableUri => "URI cannot be canonicalized",
            LintProblem::QueryInPrefix => "URI prefix has a query string",
            LintProblem::FragmentInPrefix => "URI prefix has a fragment",
            LintProblem::InvalidEnvName => "invalid environment variable name",
            LintProblem::EmptyIdentifier => "empty identifier",
        })
    }
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}: {}", self.field, self.entry, self.problem)
    }
}

/// Report every ceiling entry of `policy` that can never match.
pub fn lint(policy: &Policy) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    lint_ceiling(&policy.capability_ceiling, &mut findings);
    findings
}

fn lint_ceiling(ceiling: &PolicyCeiling, out: &mut Vec<LintFinding>) {
    const ROOT: &str = "capability_ceiling";

    for (field, entries) in [("fs.read", &ceiling.fs.read), ("fs.write", &ceiling.fs.write)] {
        for (i, entry) in entries.iter().enumerate() {
            let problem = if entry == "*" {
                Some(LintProblem::WildcardNotSupported)
            } else if normalize_guarded_path(entry).is_none() {
                Some(LintProblem::UnusablePath)
            } else {
                None
            };
            push(out, format!("{ROOT}.{field}[{i}]"), entry, problem);
        }
    }

    for (i, entry) in ceiling.net.iter().enumerate() {
        push(out, format!("{ROOT}.net[{i}]"), entry, net_problem(entry));
    }

    for name in &ceiling.env {
        let problem = (!is_valid_env_name(name)).then_some(LintProblem::InvalidEnvName);
        push(out, format!("{ROOT}.env"), name, problem);
    }

    for (field, entries) in [
        ("kv.read", &ceiling.kv.read),
        ("kv.write", &ceiling.kv.write),
        ("queue.publish", &ceiling.queue.publish),
        ("queue.consume", &ceiling.queue.consume),
    ] {
        for (i, entry) in entries.iter().enumerate() {
            let problem = entry.is_empty().then_some(LintProblem::EmptyIdentifier);
            push(out, format!("{ROOT}.{field}[{i}]"), entry, problem);
        }
    }
}

fn net_problem(entry: &str) -> Option<LintProblem> {
    if entry == "*" {
        return Some(LintProblem::WildcardNotSupported);
    }
    let Some(uri) = NetUri::parse(entry) else {
        return Some(LintProblem::UnusableUri);
    };
    if uri.as_url().query().is_some() {
        Some(LintProblem::QueryInPrefix)
    } else if uri.as_url().fragment().is_some() {
        Some(LintProblem::FragmentInPrefix)
    } else {
        None
    }
}

fn push(out: &mut Vec<LintFinding>, field: String, entry: &str, problem: Option<LintProblem>) {
    if let Some(problem) = problem {
        out.push(LintFinding {
            field,
            entry: entry.to_string(),
            problem,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_policy_has_no_findings() {
        let policy = Policy::with_ceiling(
            PolicyCeiling::deny_all()
                .with_fs_read(["/data"])
                .with_net(["https://api.example.com/v1"])
                .with_env(["API_KEY"])
                .with_kv_read(["*"]),
        );
        assert!(lint(&policy).is_empty());
    }

    #[test]
    fn test_reports_unusable_entries() {
        let policy = Policy::with_ceiling(
            PolicyCeiling::deny_all()
                .with_fs_read(["/data", "*", "data"])
                .with_fs_write(["/tmp/../etc"])
                .with_net([
                    "*",
                    "https://api.example.com/v1?key=1",
                    "https://api.example.com/v1#x",
                    "not a uri",
                ])
                .with_env(["home"])
                .with_queue_publish([""]),
        );
        let problems: Vec<_> = lint(&policy)
            .into_iter()
            .map(|f| (f.field, f.problem))
            .collect();
        assert_eq!(
            problems,
            vec![
                ("capability_ceiling.fs.read[1]".to_string(), LintProblem::WildcardNotSupported),
                ("capability_ceiling.fs.read[2]".to_string(), LintProblem::UnusablePath),
                ("capability_ceiling.fs.write[0]".to_string(), LintProblem::UnusablePath),
                ("capability_ceiling.net[0]".to_string(), LintProblem::WildcardNotSupported),
                ("capability_ceiling.net[1]".to_string(), LintProblem::QueryInPrefix),
                ("capability_ceiling.net[2]".to_string(), LintProblem::FragmentInPrefix),
                ("capability_ceiling.net[3]".to_string(), LintProblem::UnusableUri),
                ("capability_ceiling.env".to_string(), LintProblem::InvalidEnvName),
                ("capability_ceiling.queue.publish[0]".to_string(), LintProblem::EmptyIdentifier),
            ]
        );
    }

    #[test]
    fn test_finding_display() {
        let finding = LintFinding {
            field: "capability_ceiling.net[0]".to_string(),
            entry: "*".to_string(),
            problem: LintProblem::WildcardNotSupported,
        };
        assert_eq!(
            finding.to_string(),
            r#"capability_ceiling.net[0]: "*": wildcard is not supported here, use a prefix"#
        );
    }
}
