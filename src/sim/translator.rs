use crate::memory::{
    address::{VirtualAddress, physical_address},
    frame_allocator::FrameAllocator,
    page_table::{PageTable, Residency, VpnMap},
    tlb::Tlb,
};
use crate::sim::{config::SimConfig, error::Result, stats::Stats};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of translating one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub virtual_address: VirtualAddress,
    pub physical_address: u32,
    pub tlb_hit: bool,
    pub page_fault: bool,
    /// Start address of the page evicted by this reference's fault.
    pub evicted: Option<VirtualAddress>,
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> 0x{:08X}, {}, {}",
            self.virtual_address,
            self.physical_address,
            if self.tlb_hit { "TLB hit" } else { "TLB miss" },
            if self.page_fault { "Page fault" } else { "No page fault" },
        )?;
        if let Some(evicted) = self.evicted {
            write!(f, ", Evicted {evicted}")?;
        }
        Ok(())
    }
}

/// Flat view of a translation for CSV export.
#[derive(Debug, Serialize)]
pub struct TranslationRecord {
    pub virtual_address: String,
    pub physical_address: String,
    pub tlb: &'static str,
    pub page_fault: bool,
    pub evicted: Option<String>,
}

impl From<&Translation> for TranslationRecord {
    fn from(t: &Translation) -> Self {
        TranslationRecord {
            virtual_address: t.virtual_address.to_string(),
            physical_address: format!("0x{:08X}", t.physical_address),
            tlb: if t.tlb_hit { "hit" } else { "miss" },
            page_fault: t.page_fault,
            evicted: t.evicted.map(|va| va.to_string()),
        }
    }
}

struct FaultOutcome {
    pfn: u32,
    victim: Option<u32>,
    /// False when the policy dropped the faulting page straight away.
    admitted: bool,
}

/// All state of one simulation run.
#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    page_table: PageTable,
    tlb: Tlb,
    frames: FrameAllocator,
    /// Written only by fault handling and eviction.
    resident: VpnMap,
    stats: Stats,
}

impl Simulator {
    pub fn new(config: SimConfig) -> Self {
        Simulator {
            page_table: PageTable::new(config.policy, config.total_frames),
            tlb: Tlb::new(config.policy, config.tlb_size),
            frames: FrameAllocator::new(config.total_frames as u32),
            resident: VpnMap::new(),
            stats: Stats::default(),
            config,
        }
    }

    /// Translate one reference and fold it into the statistics.
    pub fn translate(&mut self, va: VirtualAddress) -> Result<Translation> {
        let vpn = va.vpn();
        let mut translation = Translation {
            virtual_address: va,
            physical_address: 0,
            tlb_hit: false,
            page_fault: false,
            evicted: None,
        };

        let pfn = if let Some(pfn) = self.tlb.lookup(vpn) {
            translation.tlb_hit = true;
            self.touch_page(vpn);
            pfn
        } else if let Some(pfn) = self.page_table.lookup(va) {
            self.touch_page(vpn);
            self.tlb.update(vpn, pfn);
            pfn
        } else {
            translation.page_fault = true;
            let outcome = self.handle_fault(va)?;
            translation.evicted = outcome.victim.map(VirtualAddress::from_vpn);
            if outcome.admitted {
                self.tlb.update(vpn, outcome.pfn);
            } else {
                // the page was only needed for this one reference
                self.frames.release(outcome.pfn);
            }
            outcome.pfn
        };

        translation.physical_address = physical_address(pfn, va.offset());
        self.stats.record(&translation);
        Ok(translation)
    }

    fn handle_fault(&mut self, va: VirtualAddress) -> Result<FaultOutcome> {
        let vpn = va.vpn();
        self.page_table.policy.insert(vpn);
        let victim = self.page_table.policy.evict_if_needed();
        let admitted = victim != Some(vpn);
        if let Some(victim) = victim.filter(|&v| v != vpn) {
            self.evict_page(victim);
        }

        let pfn = self.frames.allocate()?;
        if admitted {
            self.page_table.map(va.pdi(), va.pti(), pfn);
            self.resident.insert(
                vpn,
                Residency {
                    pfn,
                    pdi: va.pdi(),
                    pti: va.pti(),
                },
            );
        }
        debug!(vpn, pfn, ?victim, admitted, "page fault");
        Ok(FaultOutcome {
            pfn,
            victim,
            admitted,
        })
    }

    /// Notify the page policy of a reference to a resident page.
    fn touch_page(&mut self, vpn: u32) {
        if let Some(displaced) = self.page_table.policy.access(vpn) {
            debug!(vpn, displaced, "promotion displaced a page");
            self.evict_page(displaced);
        }
    }

    /// Drop a page the page policy has already let go of.
    fn evict_page(&mut self, vpn: u32) {
        let Some(residency) = self.resident.remove(&vpn) else {
            warn!(vpn, "evicted page had no residency record");
            return;
        };
        self.page_table.invalidate(residency.pdi, residency.pti);
        self.tlb.invalidate(vpn);
        self.frames.release(residency.pfn);
        debug!(vpn, pfn = residency.pfn, "page evicted");
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn tlb(&self) -> &Tlb {
        &self.tlb
    }

    pub fn residency(&self, vpn: u32) -> Option<Residency> {
        self.resident.get(&vpn).copied()
    }

    /// Cross-check the page table, TLB, residency map and frame pool.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let valid = self.page_table.valid_count();
        if valid > self.config.total_frames {
            return Err(format!("{valid} valid pages for {} frames", self.config.total_frames));
        }
        if self.tlb.len() > self.config.tlb_size {
            return Err(format!("{} tlb entries for capacity {}", self.tlb.len(), self.config.tlb_size));
        }
        if self.resident.len() != valid {
            return Err(format!("{} residency records, {valid} valid pages", self.resident.len()));
        }
        if self.page_table.policy.len() != valid {
            return Err(format!(
                "page policy tracks {} pages, {valid} valid",
                self.page_table.policy.len()
            ));
        }
        if valid + self.frames.available() != self.config.total_frames {
            return Err(format!(
                "{valid} frames in use and {} available out of {}",
                self.frames.available(),
                self.config.total_frames
            ));
        }

        let mut owners = std::collections::HashMap::new();
        for (&vpn, r) in &self.resident {
            let entry = self.page_table.entry(r.pdi, r.pti);
            if !entry.valid || entry.pfn != r.pfn {
                return Err(format!("vpn {vpn:#x} residency disagrees with its page table entry"));
            }
            if !self.page_table.policy.contains(vpn) {
                return Err(format!("vpn {vpn:#x} is resident but untracked by the page policy"));
            }
            if let Some(other) = owners.insert(r.pfn, vpn) {
                return Err(format!("frame {} owned by {other:#x} and {vpn:#x}", r.pfn));
            }
        }

        for entry in self.tlb.entries() {
            let va = VirtualAddress::from_vpn(entry.vpn);
            if entry.valid && self.page_table.lookup(va) != Some(entry.pfn) {
                return Err(format!("tlb maps vpn {:#x} without a matching page", entry.vpn));
            }
            if !self.tlb.policy().contains(entry.vpn) {
                return Err(format!("tlb entry {:#x} untracked by the tlb policy", entry.vpn));
            }
        }
        if self.tlb.policy().len() != self.tlb.entries().len() {
            return Err("tlb entries and tlb policy disagree".to_string());
        }
        Ok(())
    }
}
