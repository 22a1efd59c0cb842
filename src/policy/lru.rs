use crate::policy::replacement::PolicyKey;
use hashlink::LinkedHashSet;

/// Least recently used. Front of the list is the coldest key.
#[derive(Debug)]
pub struct Lru<K: PolicyKey> {
    order: LinkedHashSet<K>,
    capacity: usize,
}

impl<K: PolicyKey> Lru<K> {
    pub fn new(capacity: usize) -> Self {
        Lru {
            order: LinkedHashSet::new(),
            capacity,
        }
    }

    /// Move a resident key to the most-recent end.
    pub fn access(&mut self, key: K) {
        self.order.to_back(&key);
    }

    pub fn insert(&mut self, key: K) {
        if !self.order.contains(&key) {
            self.order.insert(key);
        }
    }

    pub fn evict_if_needed(&mut self) -> Option<K> {
        if self.order.len() > self.capacity {
            return self.order.pop_front();
        }
        None
    }

    pub fn erase(&mut self, key: K) {
        self.order.remove(&key);
    }

    pub fn contains(&self, key: K) -> bool {
        self.order.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_refreshes_key() {
        let mut lru = Lru::new(2);
        lru.insert(0u32);
        lru.insert(1);
        lru.access(0);
        lru.insert(2);
        assert_eq!(lru.evict_if_needed(), Some(1));
        assert!(lru.contains(0));
        assert!(lru.contains(2));
    }

    #[test]
    fn test_access_absent_key_does_not_admit() {
        let mut lru = Lru::new(1);
        lru.access(5u32);
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.evict_if_needed(), None);
    }
}
