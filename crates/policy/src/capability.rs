use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability kinds that can be requested against a policy ceiling.
///
/// The set is closed: a new kind needs a new variant and a new arm in the
/// decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    #[serde(rename = "exec")]
    Exec,
    #[serde(rename = "exec.safe")]
    ExecSafe,
    #[serde(rename = "time.now")]
    TimeNow,
    #[serde(rename = "random.bytes")]
    RandomBytes,
    #[serde(rename = "env")]
    Env,
    #[serde(rename = "net.http")]
    NetHttp,
    #[serde(rename = "fs.read")]
    FsRead,
    #[serde(rename = "fs.write")]
    FsWrite,
    #[serde(rename = "kv.read")]
    KvRead,
    #[serde(rename = "kv.write")]
    KvWrite,
    #[serde(rename = "queue.publish")]
    QueuePublish,
    #[serde(rename = "queue.consume")]
    QueueConsume,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 12] = [
        CapabilityKind::Exec,
        CapabilityKind::ExecSafe,
        CapabilityKind::TimeNow,
        CapabilityKind::RandomBytes,
        CapabilityKind::Env,
        CapabilityKind::NetHttp,
        CapabilityKind::FsRead,
        CapabilityKind::FsWrite,
        CapabilityKind::KvRead,
        CapabilityKind::KvWrite,
        CapabilityKind::QueuePublish,
        CapabilityKind::QueueConsume,
    ];

    /// The dotted wire name, e.g. `fs.read`.
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityKind::Exec => "exec",
            CapabilityKind::ExecSafe => "exec.safe",
            CapabilityKind::TimeNow => "time.now",
            CapabilityKind::RandomBytes => "random.bytes",
            CapabilityKind::Env => "env",
            CapabilityKind::NetHttp => "net.http",
            CapabilityKind::FsRead => "fs.read",
            CapabilityKind::FsWrite => "fs.write",
            CapabilityKind::KvRead => "kv.read",
            CapabilityKind::KvWrite => "kv.write",
            CapabilityKind::QueuePublish => "queue.publish",
            CapabilityKind::QueueConsume => "queue.consume",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CapabilityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// A single access attempt: a kind and the value it targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityRequest {
    pub kind: CapabilityKind,
    pub value: String, // e.g., path, URI, variable name, topic
}

impl CapabilityRequest {
    pub fn new(kind: CapabilityKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Build a request from raw `(kind, value)` strings.
    pub fn parse(kind: &str, value: impl Into<String>) -> Result<Self> {
        Ok(Self::new(kind.parse()?, value))
    }

    /// `exec` requests carry the literal value `"true"`.
    pub fn exec() -> Self {
        Self::new(CapabilityKind::Exec, "true")
    }

    pub fn exec_safe(command: impl Into<String>) -> Self {
        Self::new(CapabilityKind::ExecSafe, command)
    }

    pub fn time_now(clock: impl Into<String>) -> Self {
        Self::new(CapabilityKind::TimeNow, clock)
    }

    pub fn random_bytes(source: impl Into<String>) -> Self {
        Self::new(CapabilityKind::RandomBytes, source)
    }

    pub fn env(name: impl Into<String>) -> Self {
        Self::new(CapabilityKind::Env, name)
    }

    pub fn net_http(uri: impl Into<String>) -> Self {
        Self::new(CapabilityKind::NetHttp, uri)
    }

    pub fn fs_read(path: impl Into<String>) -> Self {
        Self::new(CapabilityKind::FsRead, path)
    }

    pub fn fs_write(path: impl Into<String>) -> Self {
        Self::new(CapabilityKind::FsWrite, path)
    }

    pub fn kv_read(namespace: impl Into<String>) -> Self {
        Self::new(CapabilityKind::KvRead, namespace)
    }

    pub fn kv_write(namespace: impl Into<String>) -> Self {
        Self::new(CapabilityKind::KvWrite, namespace)
    }

    pub fn queue_publish(topic: impl Into<String>) -> Self {
        Self::new(CapabilityKind::QueuePublish, topic)
    }

    pub fn queue_consume(topic: impl Into<String>) -> Self {
        Self::new(CapabilityKind::QueueConsume, topic)
    }
}
