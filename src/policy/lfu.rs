use crate::policy::replacement::PolicyKey;
use hashlink::LinkedHashSet;
use std::collections::HashMap;

/// Least frequently used, ties broken by insertion order.
#[derive(Debug)]
pub struct Lfu<K: PolicyKey> {
    freq: HashMap<K, u32>,
    /// Insertion order; the back is the key admitted last.
    order: LinkedHashSet<K>,
    capacity: usize,
}

impl<K: PolicyKey> Lfu<K> {
    pub fn new(capacity: usize) -> Self {
        Lfu {
            freq: HashMap::new(),
            order: LinkedHashSet::new(),
            capacity,
        }
    }

    pub fn access(&mut self, key: K) {
        if let Some(count) = self.freq.get_mut(&key) {
            *count += 1;
        }
    }

    pub fn insert(&mut self, key: K) {
        if !self.freq.contains_key(&key) {
            self.freq.insert(key, 1);
            self.order.insert(key);
        }
    }

    /// The key admitted last is only a candidate when it is the sole resident.
    pub fn evict_if_needed(&mut self) -> Option<K> {
        if self.order.len() <= self.capacity {
            return None;
        }
        let candidates = self.order.len().saturating_sub(1).max(1);
        let mut victim: Option<(K, u32)> = None;
        for &key in self.order.iter().take(candidates) {
            let count = self.freq.get(&key).copied().unwrap_or(0);
            match victim {
                Some((_, best)) if best <= count => {}
                _ => victim = Some((key, count)),
            }
        }
        let (key, _) = victim?;
        self.erase(key);
        Some(key)
    }

    pub fn erase(&mut self, key: K) {
        self.freq.remove(&key);
        self.order.remove(&key);
    }

    pub fn contains(&self, key: K) -> bool {
        self.freq.contains_key(&key)
    }

    pub fn frequency(&self, key: K) -> Option<u32> {
        self.freq.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}
