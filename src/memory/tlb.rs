use crate::policy::replacement::{PolicyKind, ReplacementPolicy};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbEntry {
    pub vpn: u32,
    pub pfn: u32,
    pub valid: bool,
}

/// Fully-associative translation cache.
///
/// `entries` and `policy` always hold the same set of vpns; every method that
/// touches one updates the other before returning.
#[derive(Debug)]
pub struct Tlb {
    entries: Vec<TlbEntry>,
    policy: ReplacementPolicy<u32>,
}

impl Tlb {
    pub fn new(kind: PolicyKind, capacity: usize) -> Self {
        Tlb {
            entries: Vec::new(),
            policy: ReplacementPolicy::new(kind, capacity),
        }
    }

    pub fn lookup(&mut self, vpn: u32) -> Option<u32> {
        let pfn = self
            .entries
            .iter()
            .find(|e| e.valid && e.vpn == vpn)
            .map(|e| e.pfn)?;
        if let Some(displaced) = self.policy.access(vpn) {
            self.remove_entry(displaced);
        }
        Some(pfn)
    }

    /// Cache `vpn → pfn`. Returns false when the policy refused to keep it.
    pub fn update(&mut self, vpn: u32, pfn: u32) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.vpn == vpn) {
            entry.pfn = pfn;
            if let Some(displaced) = self.policy.access(vpn) {
                self.remove_entry(displaced);
            }
            return true;
        }

        self.policy.insert(vpn);
        if let Some(victim) = self.policy.evict_if_needed() {
            if victim == vpn {
                debug!(vpn, "tlb declined translation");
                return false;
            }
            self.remove_entry(victim);
        }
        self.entries.push(TlbEntry {
            vpn,
            pfn,
            valid: true,
        });
        true
    }

    pub fn invalidate(&mut self, vpn: u32) {
        self.remove_entry(vpn);
        self.policy.erase(vpn);
    }

    pub fn contains(&self, vpn: u32) -> bool {
        self.entries.iter().any(|e| e.valid && e.vpn == vpn)
    }

    pub fn entries(&self) -> &[TlbEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn policy(&self) -> &ReplacementPolicy<u32> {
        &self.policy
    }

    fn remove_entry(&mut self, vpn: u32) {
        self.entries.retain(|e| e.vpn != vpn);
    }
}
