//! Policy documents and the capability ceiling they grant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A policy document. Only the ceiling takes part in capability decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    pub version: u64,

    /// Signer identities trusted by this policy.
    #[serde(default)]
    pub trusted_signers: Vec<String>,

    /// Maximum capability surface granted to code running under this policy.
    #[serde(default)]
    pub capability_ceiling: PolicyCeiling,
}

impl Policy {
    /// A version 1 policy with the given ceiling and no trusted signers.
    pub fn with_ceiling(capability_ceiling: PolicyCeiling) -> Self {
        Self {
            version: 1,
            trusted_signers: Vec::new(),
            capability_ceiling,
        }
    }
}

/// The maximum capability surface of a policy.
///
/// Every field defaults to an empty grant, so an omitted section never
/// allows anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyCeiling {
    /// Allowed filesystem path prefixes per access mode.
    #[serde(default)]
    pub fs: FsCeiling,

    /// Allowed URI prefixes for outbound HTTP.
    #[serde(default)]
    pub net: Vec<String>,

    /// Allowed environment variable names.
    #[serde(default)]
    pub env: BTreeSet<String>,

    /// Allowed key-value namespaces (`"*"` = any).
    #[serde(default)]
    pub kv: KvCeiling,

    /// Allowed queue topics (`"*"` = any).
    #[serde(default)]
    pub queue: QueueCeiling,

    #[serde(default)]
    pub exec: bool,

    #[serde(default)]
    pub time: bool,

    #[serde(default)]
    pub random: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FsCeiling {
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KvCeiling {
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueCeiling {
    #[serde(default)]
    pub publish: Vec<String>,
    #[serde(default)]
    pub consume: Vec<String>,
}

fn owned<I, S>(items: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into)
}

impl PolicyCeiling {
    /// An empty ceiling: every request is denied.
    pub fn deny_all() -> Self {
        Self::default()
    }

    pub fn with_fs_read<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fs.read.extend(owned(prefixes));
        self
    }

    pub fn with_fs_write<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fs.write.extend(owned(prefixes));
        self
    }

    pub fn with_net<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.net.extend(owned(prefixes));
        self
    }

    pub fn with_env<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env.extend(owned(names));
        self
    }

    pub fn with_kv_read<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kv.read.extend(owned(namespaces));
        self
    }

    pub fn with_kv_write<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kv.write.extend(owned(namespaces));
        self
    }

    pub fn with_queue_publish<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queue.publish.extend(owned(topics));
        self
    }

    pub fn with_queue_consume<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queue.consume.extend(owned(topics));
        self
    }

    pub fn with_exec(mut self, allowed: bool) -> Self {
        self.exec = allowed;
        self
    }

    pub fn with_time(mut self, allowed: bool) -> Self {
        self.time = allowed;
        self
    }

    pub fn with_random(mut self, allowed: bool) -> Self {
        self.random = allowed;
        self
    }
}
