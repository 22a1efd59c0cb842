use crate::policy::{fifo::Fifo, lfu::Lfu, lru::Lru, s3fifo::S3Fifo};
use crate::sim::error::SimError;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::str::FromStr;

/// Keys tracked by a replacement policy (virtual page numbers in practice).
pub trait PolicyKey: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> PolicyKey for T {}

/// Which eviction algorithm a cache uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum PolicyKind {
    #[serde(rename = "FIFO")]
    Fifo,
    #[serde(rename = "LRU")]
    Lru,
    #[serde(rename = "LFU")]
    Lfu,
    #[serde(rename = "S3FIFO")]
    S3Fifo,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Fifo,
        PolicyKind::Lru,
        PolicyKind::Lfu,
        PolicyKind::S3Fifo,
    ];
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIFO" => Ok(PolicyKind::Fifo),
            "LRU" => Ok(PolicyKind::Lru),
            "LFU" => Ok(PolicyKind::Lfu),
            "S3FIFO" => Ok(PolicyKind::S3Fifo),
            other => Err(SimError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
            PolicyKind::S3Fifo => "S3FIFO",
        };
        f.write_str(name)
    }
}

/// Bookkeeping of "which key goes next" for a fixed-capacity set of keys.
///
/// A policy never stores values. Callers pair every `insert` with an
/// `evict_if_needed` and must drop whatever key comes back from either
/// `evict_if_needed` or `access` from their own storage: the policy has
/// already forgotten it.
#[derive(Debug)]
pub enum ReplacementPolicy<K: PolicyKey> {
    Fifo(Fifo<K>),
    Lru(Lru<K>),
    Lfu(Lfu<K>),
    S3Fifo(S3Fifo<K>),
}

impl<K: PolicyKey> ReplacementPolicy<K> {
    pub fn new(kind: PolicyKind, capacity: usize) -> Self {
        match kind {
            PolicyKind::Fifo => ReplacementPolicy::Fifo(Fifo::new(capacity)),
            PolicyKind::Lru => ReplacementPolicy::Lru(Lru::new(capacity)),
            PolicyKind::Lfu => ReplacementPolicy::Lfu(Lfu::new(capacity)),
            PolicyKind::S3Fifo => ReplacementPolicy::S3Fifo(S3Fifo::new(capacity)),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            ReplacementPolicy::Fifo(_) => PolicyKind::Fifo,
            ReplacementPolicy::Lru(_) => PolicyKind::Lru,
            ReplacementPolicy::Lfu(_) => PolicyKind::Lfu,
            ReplacementPolicy::S3Fifo(_) => PolicyKind::S3Fifo,
        }
    }

    /// Record a reference to a resident key. Returns a key that had to be
    /// evicted as a side effect (only S3-FIFO promotions do this).
    pub fn access(&mut self, key: K) -> Option<K> {
        match self {
            ReplacementPolicy::Fifo(p) => {
                p.access(key);
                None
            }
            ReplacementPolicy::Lru(p) => {
                p.access(key);
                None
            }
            ReplacementPolicy::Lfu(p) => {
                p.access(key);
                None
            }
            ReplacementPolicy::S3Fifo(p) => p.access(key),
        }
    }

    /// Admit a key. No-op if it is already resident.
    pub fn insert(&mut self, key: K) {
        match self {
            ReplacementPolicy::Fifo(p) => p.insert(key),
            ReplacementPolicy::Lru(p) => p.insert(key),
            ReplacementPolicy::Lfu(p) => p.insert(key),
            ReplacementPolicy::S3Fifo(p) => p.insert(key),
        }
    }

    /// Pick a victim if the resident set is over budget.
    pub fn evict_if_needed(&mut self) -> Option<K> {
        match self {
            ReplacementPolicy::Fifo(p) => p.evict_if_needed(),
            ReplacementPolicy::Lru(p) => p.evict_if_needed(),
            ReplacementPolicy::Lfu(p) => p.evict_if_needed(),
            ReplacementPolicy::S3Fifo(p) => p.evict_if_needed(),
        }
    }

    /// Forget a key entirely. Safe on absent keys.
    pub fn erase(&mut self, key: K) {
        match self {
            ReplacementPolicy::Fifo(p) => p.erase(key),
            ReplacementPolicy::Lru(p) => p.erase(key),
            ReplacementPolicy::Lfu(p) => p.erase(key),
            ReplacementPolicy::S3Fifo(p) => p.erase(key),
        }
    }

    pub fn contains(&self, key: K) -> bool {
        match self {
            ReplacementPolicy::Fifo(p) => p.contains(key),
            ReplacementPolicy::Lru(p) => p.contains(key),
            ReplacementPolicy::Lfu(p) => p.contains(key),
            ReplacementPolicy::S3Fifo(p) => p.contains(key),
        }
    }

    /// Number of resident keys.
    pub fn len(&self) -> usize {
        match self {
            ReplacementPolicy::Fifo(p) => p.len(),
            ReplacementPolicy::Lru(p) => p.len(),
            ReplacementPolicy::Lfu(p) => p.len(),
            ReplacementPolicy::S3Fifo(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_s3fifo(&self) -> Option<&S3Fifo<K>> {
        match self {
            ReplacementPolicy::S3Fifo(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy_names() {
        assert_eq!("FIFO".parse::<PolicyKind>().unwrap(), PolicyKind::Fifo);
        assert_eq!("S3FIFO".parse::<PolicyKind>().unwrap(), PolicyKind::S3Fifo);
        assert!(matches!(
            "CLOCK".parse::<PolicyKind>(),
            Err(SimError::UnknownPolicy(name)) if name == "CLOCK"
        ));
    }

    #[test]
    fn test_erase_absent_key_is_noop_for_every_variant() {
        for kind in PolicyKind::ALL {
            let mut policy: ReplacementPolicy<u32> = ReplacementPolicy::new(kind, 4);
            policy.insert(1);
            policy.erase(7);
            policy.erase(1);
            policy.erase(1);
            assert!(policy.is_empty(), "{kind}");
            assert_eq!(policy.kind(), kind);
        }
    }
}
