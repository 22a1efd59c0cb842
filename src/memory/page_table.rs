use crate::memory::address::{TABLE_ENTRIES, VirtualAddress};
use crate::policy::replacement::{PolicyKind, ReplacementPolicy};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    pub pfn: u32,
    pub valid: bool,
}

/// Where a resident page lives: its frame and its slot in the page table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Residency {
    pub pfn: u32,
    pub pdi: usize,
    pub pti: usize,
}

/// vpn → residency for every page currently holding a frame. The page table
/// cannot map a frame back to its `(pdi, pti)`, so eviction goes through here.
pub type VpnMap = HashMap<u32, Residency>;

/// Two-level page table. Second-level tables are allocated on first use.
#[derive(Debug)]
pub struct PageTable {
    directory: Vec<Option<Box<[PageTableEntry]>>>,
    valid: usize,
    /// Sized to the number of physical frames.
    pub policy: ReplacementPolicy<u32>,
}

impl PageTable {
    pub fn new(kind: PolicyKind, total_frames: usize) -> Self {
        PageTable {
            directory: vec![None; TABLE_ENTRIES],
            valid: 0,
            policy: ReplacementPolicy::new(kind, total_frames),
        }
    }

    pub fn entry(&self, pdi: usize, pti: usize) -> PageTableEntry {
        self.directory[pdi]
            .as_ref()
            .map(|table| table[pti])
            .unwrap_or_default()
    }

    /// Frame of a valid entry for `va`'s page.
    pub fn lookup(&self, va: VirtualAddress) -> Option<u32> {
        let entry = self.entry(va.pdi(), va.pti());
        entry.valid.then_some(entry.pfn)
    }

    pub fn map(&mut self, pdi: usize, pti: usize, pfn: u32) {
        let table = self.directory[pdi]
            .get_or_insert_with(|| vec![PageTableEntry::default(); TABLE_ENTRIES].into_boxed_slice());
        if !table[pti].valid {
            self.valid += 1;
        }
        table[pti] = PageTableEntry { pfn, valid: true };
    }

    pub fn invalidate(&mut self, pdi: usize, pti: usize) {
        if let Some(table) = self.directory[pdi].as_mut() {
            if table[pti].valid {
                table[pti].valid = false;
                self.valid -= 1;
            }
        }
    }

    /// Number of valid entries.
    pub fn valid_count(&self) -> usize {
        self.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_lookup_invalidate() {
        let mut pt = PageTable::new(PolicyKind::Fifo, 4);
        let va = VirtualAddress(0x0040_2123);
        assert_eq!(pt.lookup(va), None);
        pt.map(va.pdi(), va.pti(), 7);
        assert_eq!(pt.lookup(va), Some(7));
        assert_eq!(pt.lookup(VirtualAddress(0x0040_2FFF)), Some(7));
        assert_eq!(pt.valid_count(), 1);
        pt.map(va.pdi(), va.pti(), 8);
        assert_eq!(pt.valid_count(), 1);
        pt.invalidate(va.pdi(), va.pti());
        pt.invalidate(va.pdi(), va.pti());
        assert_eq!(pt.lookup(va), None);
        assert_eq!(pt.entry(va.pdi(), va.pti()).pfn, 8);
        assert_eq!(pt.valid_count(), 0);
    }

    #[test]
    fn test_invalidate_unallocated_table() {
        let mut pt = PageTable::new(PolicyKind::Lru, 1);
        pt.invalidate(1023, 1023);
        assert_eq!(pt.valid_count(), 0);
    }
}
