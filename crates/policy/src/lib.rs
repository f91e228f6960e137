//! Capability decisions against a policy ceiling.
//!
//! Core principle: **anything not explicitly granted is denied.**
//!
//! A [`Policy`] carries a [`PolicyCeiling`], the maximum capability surface
//! granted to untrusted code. A [`CapabilityRequest`] names one access
//! attempt. [`evaluate`] compares the two and returns a single bit; malformed
//! values, unparseable URIs, traversal segments and missing ceiling sections
//! all resolve to `false`.
//!
//! Evaluation is pure and synchronous. It holds no state between calls,
//! performs no I/O and gives the same answer for the same inputs every time.
//! Callers enforce the decision; this crate only makes it.
//!
//! # Example
//!
//! ```
//! use policy::{CapabilityRequest, Policy, PolicyCeiling, evaluate};
//!
//! let policy = Policy::with_ceiling(
//!     PolicyCeiling::deny_all()
//!         .with_fs_read(["/data"])
//!         .with_net(["https://api.example.com/v1"]),
//! );
//!
//! assert!(evaluate(&policy, &CapabilityRequest::fs_read("/data/a.txt")));
//! assert!(!evaluate(&policy, &CapabilityRequest::fs_read("/data/../etc/passwd")));
//! assert!(!evaluate(&policy, &CapabilityRequest::net_http("https://api.example.com:8443/v1")));
//! ```

mod capability;
mod engine;
mod error;
pub mod lint;
pub mod path;
mod policy;
pub mod prefix;
pub mod uri;

pub use capability::{CapabilityKind, CapabilityRequest};
pub use engine::{Decision, Denial, evaluate, explain};
pub use error::{Error, Result};
pub use lint::{LintFinding, LintProblem, lint};
pub use path::{CanonicalPath, normalize_fs_path, normalize_guarded_path};
pub use policy::{FsCeiling, KvCeiling, Policy, PolicyCeiling, QueueCeiling};
pub use prefix::within_prefix;
pub use uri::{NetUri, net_within_prefix};
