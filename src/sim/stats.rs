use crate::sim::translator::Translation;
use serde::Serialize;
use std::fmt;

/// Running counters over all translated references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_references: u64,
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    pub page_faults: u64,
}

impl Stats {
    pub fn record(&mut self, translation: &Translation) {
        self.total_references += 1;
        if translation.tlb_hit {
            self.tlb_hits += 1;
        } else {
            self.tlb_misses += 1;
        }
        if translation.page_fault {
            self.page_faults += 1;
        }
    }

    pub fn tlb_hit_ratio(&self) -> f64 {
        percent(self.tlb_hits, self.total_references)
    }

    pub fn page_fault_rate(&self) -> f64 {
        percent(self.page_faults, self.total_references)
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// The end-of-run summary block, one counter per line.
impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total references: {}", self.total_references)?;
        writeln!(f, "TLB hits: {}", self.tlb_hits)?;
        writeln!(f, "TLB misses: {}", self.tlb_misses)?;
        writeln!(f, "TLB hit ratio: {:.1}%", self.tlb_hit_ratio())?;
        writeln!(f, "Page faults: {}", self.page_faults)?;
        write!(f, "Page fault rate: {:.1}%", self.page_fault_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_reports_zero_ratios() {
        let stats = Stats::default();
        assert_eq!(stats.tlb_hit_ratio(), 0.0);
        assert!(stats.to_string().contains("Page fault rate: 0.0%"));
    }

    #[test]
    fn test_summary_format() {
        let stats = Stats {
            total_references: 3,
            tlb_hits: 1,
            tlb_misses: 2,
            page_faults: 2,
        };
        assert_eq!(
            stats.to_string(),
            "Total references: 3\nTLB hits: 1\nTLB misses: 2\nTLB hit ratio: 33.3%\n\
             Page faults: 2\nPage fault rate: 66.7%"
        );
    }
}
