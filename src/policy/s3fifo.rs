//! S3-FIFO: a small probationary FIFO, a main FIFO and a ghost FIFO of keys
//! recently dropped from the small queue.
//!
//! Every queue keeps its head at the back of the linked set and its tail at
//! the front, so "insert at head" is `insert` and "pop tail" is `pop_front`.

use crate::policy::replacement::PolicyKey;
use hashlink::LinkedHashSet;
use std::collections::HashMap;
use tracing::trace;

const MAX_FREQ: u8 = 3;
const SMALL_RATIO: f64 = 0.1;

#[derive(Debug)]
pub struct S3Fifo<K: PolicyKey> {
    small: LinkedHashSet<K>,
    main: LinkedHashSet<K>,
    ghost: LinkedHashSet<K>,
    freq: HashMap<K, u8>,
    capacity: usize,
    cap_small: usize,
    cap_main: usize,
    cap_ghost: usize,
}

impl<K: PolicyKey> S3Fifo<K> {
    pub fn new(capacity: usize) -> Self {
        let mut cap_small = (capacity as f64 * SMALL_RATIO).round() as usize;
        let mut cap_main = capacity - cap_small;
        let mut cap_ghost = cap_small;
        if capacity > 0 {
            cap_small = cap_small.max(1);
            cap_main = cap_main.max(1);
            cap_ghost = cap_ghost.max(1);
        }
        S3Fifo {
            small: LinkedHashSet::new(),
            main: LinkedHashSet::new(),
            ghost: LinkedHashSet::new(),
            freq: HashMap::new(),
            capacity,
            cap_small,
            cap_main,
            cap_ghost,
        }
    }

    /// Bump the frequency of a resident key. The first reference to a key in
    /// the small queue promotes it to the main queue; if main had to make
    /// room for it, the evicted key is returned.
    pub fn access(&mut self, key: K) -> Option<K> {
        let in_small = self.small.contains(&key);
        if !in_small && !self.main.contains(&key) {
            return None;
        }
        let old = self.frequency(key).unwrap_or(0);
        self.freq.insert(key, (old + 1).min(MAX_FREQ));

        if in_small && old == 0 {
            self.small.remove(&key);
            let victim = self.make_room_in_main();
            self.push_main(key);
            self.log_state("lazy promotion");
            return victim;
        }
        None
    }

    pub fn insert(&mut self, key: K) {
        if self.contains(key) {
            return;
        }
        if self.ghost.remove(&key) {
            self.push_main(key);
            self.log_state("ghost readmission");
        } else {
            self.small.insert(key);
            self.freq.insert(key, 0);
            self.log_state("insert");
        }
    }

    pub fn evict_if_needed(&mut self) -> Option<K> {
        while self.len() > 0 && self.len() >= self.capacity {
            let victim = if !self.small.is_empty() && self.small.len() >= self.cap_small {
                self.evict_small()
            } else if !self.main.is_empty() {
                self.evict_main()
            } else {
                unreachable!("small queue below threshold with an empty main queue");
            };
            if victim.is_some() {
                self.log_state("evict");
                return victim;
            }
        }
        None
    }

    pub fn erase(&mut self, key: K) {
        self.small.remove(&key);
        self.main.remove(&key);
        self.ghost.remove(&key);
        self.freq.remove(&key);
    }

    pub fn contains(&self, key: K) -> bool {
        self.small.contains(&key) || self.main.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.small.len() + self.main.len()
    }

    pub fn in_small(&self, key: K) -> bool {
        self.small.contains(&key)
    }

    pub fn in_main(&self, key: K) -> bool {
        self.main.contains(&key)
    }

    pub fn in_ghost(&self, key: K) -> bool {
        self.ghost.contains(&key)
    }

    pub fn frequency(&self, key: K) -> Option<u8> {
        self.freq.get(&key).copied()
    }

    /// `(small, main, ghost)` queue capacities.
    pub fn capacities(&self) -> (usize, usize, usize) {
        (self.cap_small, self.cap_main, self.cap_ghost)
    }

    fn push_main(&mut self, key: K) {
        self.main.insert(key);
        self.freq.insert(key, 0);
    }

    /// Run main-queue steps until one of them frees a slot.
    fn make_room_in_main(&mut self) -> Option<K> {
        while !self.main.is_empty() && self.main.len() >= self.cap_main {
            if let Some(victim) = self.evict_main() {
                return Some(victim);
            }
        }
        None
    }

    fn evict_small(&mut self) -> Option<K> {
        let key = self.small.pop_front()?;
        let freq = self.frequency(key).unwrap_or(0);
        if freq >= 2 {
            let victim = self.make_room_in_main();
            self.push_main(key);
            return victim;
        }
        // frequency 0 is treated like 1: straight to the ghost queue
        self.freq.remove(&key);
        self.ghost.insert(key);
        if self.ghost.len() > self.cap_ghost {
            self.ghost.pop_front();
        }
        Some(key)
    }

    fn evict_main(&mut self) -> Option<K> {
        let key = self.main.pop_front()?;
        match self.frequency(key).unwrap_or(0) {
            0 => {
                self.freq.remove(&key);
                Some(key)
            }
            freq => {
                self.freq.insert(key, freq - 1);
                self.main.insert(key);
                None
            }
        }
    }

    fn log_state(&self, event: &str) {
        trace!(
            event,
            small = ?self.small,
            main = ?self.main,
            ghost = ?self.ghost,
            freq = ?self.freq,
            "s3fifo state"
        );
    }
}
