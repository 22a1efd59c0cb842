use crate::policy::replacement::PolicyKey;
use hashlink::LinkedHashSet;

/// First-in first-out: evicts the oldest admitted key, ignores references.
#[derive(Debug)]
pub struct Fifo<K: PolicyKey> {
    queue: LinkedHashSet<K>,
    capacity: usize,
}

impl<K: PolicyKey> Fifo<K> {
    pub fn new(capacity: usize) -> Self {
        Fifo {
            queue: LinkedHashSet::new(),
            capacity,
        }
    }

    pub fn access(&mut self, _key: K) {}

    pub fn insert(&mut self, key: K) {
        if !self.queue.contains(&key) {
            self.queue.insert(key);
        }
    }

    pub fn evict_if_needed(&mut self) -> Option<K> {
        if self.queue.len() > self.capacity {
            return self.queue.pop_front();
        }
        None
    }

    pub fn erase(&mut self, key: K) {
        self.queue.remove(&key);
    }

    pub fn contains(&self, key: K) -> bool {
        self.queue.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
