use vmsim::memory::address::VirtualAddress;
use vmsim::policy::replacement::PolicyKind;
use vmsim::sim::{config::SimConfig, translator::Simulator, translator::Translation};

fn simulator(frames: usize, tlb: usize, policy: PolicyKind) -> Simulator {
    Simulator::new(SimConfig::new(frames, tlb, policy).unwrap())
}

fn run(sim: &mut Simulator, addrs: &[u32]) -> Vec<Translation> {
    addrs
        .iter()
        .map(|&a| {
            let t = sim.translate(VirtualAddress(a)).unwrap();
            sim.check_invariants().unwrap();
            t
        })
        .collect()
}

fn pages(vpns: &[u32]) -> Vec<u32> {
    vpns.iter().map(|v| v << 12).collect()
}

#[test]
fn test_fifo_evicts_first_page() {
    for tlb in [1, 2, 8] {
        let mut sim = simulator(2, tlb, PolicyKind::Fifo);
        let out = run(&mut sim, &[0x0000_0000, 0x0000_1000, 0x0000_2000]);
        assert!(out.iter().all(|t| t.page_fault));
        assert_eq!(out[2].evicted, Some(VirtualAddress(0)));
        assert_eq!(
            out[2].to_string(),
            "0x00002000 -> 0x00000000, TLB miss, Page fault, Evicted 0x00000000"
        );
    }
}

#[test]
fn test_lru_keeps_refreshed_page() {
    for tlb in [1, 4] {
        let mut sim = simulator(2, tlb, PolicyKind::Lru);
        let out = run(&mut sim, &pages(&[0, 1, 0, 2]));
        assert!(!out[2].page_fault);
        assert_eq!(out[3].evicted, Some(VirtualAddress(0x1000)));
        assert!(sim.residency(0).is_some());
    }
}

#[test]
fn test_lfu_evicts_less_frequent_page() {
    let mut sim = simulator(2, 4, PolicyKind::Lfu);
    let out = run(&mut sim, &pages(&[0, 1, 0, 2]));
    assert!(out[2].tlb_hit);
    assert_eq!(out[3].evicted, Some(VirtualAddress(0x1000)));
}

#[test]
fn test_s3fifo_one_hit_wonder_goes_to_ghost() {
    let mut sim = simulator(10, 4, PolicyKind::S3Fifo);
    let out = run(&mut sim, &pages(&(0..10).collect::<Vec<_>>()));
    assert!(out[..9].iter().all(|t| t.evicted.is_none()));
    assert_eq!(out[9].evicted, Some(VirtualAddress(0)));

    let s3 = sim.page_table().policy.as_s3fifo().unwrap();
    assert!(s3.in_ghost(0));
    assert!(!s3.in_main(0));

    // coming back from the ghost queue skips the small queue
    let again = run(&mut sim, &pages(&[0]));
    assert!(again[0].page_fault);
    assert_eq!(again[0].evicted, Some(VirtualAddress(0x1000)));
    let s3 = sim.page_table().policy.as_s3fifo().unwrap();
    assert!(s3.in_main(0));
    assert_eq!(s3.frequency(0), Some(0));
}

#[test]
fn test_s3fifo_declined_page_is_not_mapped() {
    let mut sim = simulator(10, 4, PolicyKind::S3Fifo);
    let mut trace = Vec::new();
    for vpn in 1..=9u32 {
        trace.push(vpn << 12);
        trace.push((vpn << 12) | 0x10);
    }
    run(&mut sim, &trace);
    let s3 = sim.page_table().policy.as_s3fifo().unwrap();
    assert!((1..=9).all(|vpn| s3.in_main(vpn)));

    let out = run(&mut sim, &[0x0006_4ABC]);
    assert!(out[0].page_fault);
    assert_eq!(out[0].evicted, Some(VirtualAddress(0x0006_4000)));
    assert_eq!(out[0].physical_address, 0x0000_9ABC);
    assert!(sim.residency(0x64).is_none());
    assert!(!sim.tlb().contains(0x64));
    assert_eq!(sim.page_table().valid_count(), 9);

    let out = run(&mut sim, &[0x0006_4000]);
    assert!(out[0].page_fault);
    assert_eq!(out[0].evicted, Some(VirtualAddress(0x1000)));
    assert!(sim.residency(0x64).is_some());
}

#[test]
fn test_tlb_hit_after_miss_and_offset_kept() {
    let mut sim = simulator(4, 2, PolicyKind::Fifo);
    let out = run(&mut sim, &[0x1234_5678, 0x1234_5FFF]);
    assert_eq!(
        out[0].to_string(),
        "0x12345678 -> 0x00000678, TLB miss, Page fault"
    );
    assert_eq!(
        out[1].to_string(),
        "0x12345FFF -> 0x00000FFF, TLB hit, No page fault"
    );
}

#[test]
fn test_page_table_hit_after_tlb_eviction() {
    let mut sim = simulator(4, 1, PolicyKind::Lru);
    let out = run(&mut sim, &pages(&[0, 1, 0]));
    assert!(!out[2].tlb_hit);
    assert!(!out[2].page_fault);
    assert_eq!(out[2].physical_address, 0);
}

#[test]
fn test_evicted_page_leaves_tlb() {
    let mut sim = simulator(1, 4, PolicyKind::Fifo);
    run(&mut sim, &pages(&[3]));
    assert!(sim.tlb().contains(3));
    let out = run(&mut sim, &pages(&[4, 3]));
    assert_eq!(out[0].evicted, Some(VirtualAddress(0x3000)));
    assert!(!sim.tlb().contains(3));
    assert!(!out[1].tlb_hit);
    assert!(out[1].page_fault);
}

#[test]
fn test_zero_tlb_never_hits() {
    let mut sim = simulator(2, 0, PolicyKind::S3Fifo);
    let out = run(&mut sim, &pages(&[0, 0, 0]));
    assert!(out.iter().all(|t| !t.tlb_hit));
    assert!(sim.tlb().is_empty());
}

#[test]
fn test_stats_follow_translations() {
    let mut sim = simulator(2, 2, PolicyKind::Lru);
    run(&mut sim, &pages(&[0, 0, 1, 2, 0]));
    let stats = sim.stats();
    assert_eq!(stats.total_references, 5);
    assert_eq!(stats.tlb_hits, 1);
    assert_eq!(stats.tlb_misses, 4);
    assert_eq!(stats.page_faults, 4);
    assert_eq!(format!("{:.1}", stats.page_fault_rate()), "80.0");
}

#[test]
fn test_replay_is_deterministic() {
    let trace: Vec<u32> = (0..400u32)
        .map(|i| ((i * 7919) % 23) << 12 | (i % 4096))
        .collect();
    for kind in PolicyKind::ALL {
        let mut a = simulator(5, 3, kind);
        let mut b = simulator(5, 3, kind);
        assert_eq!(run(&mut a, &trace), run(&mut b, &trace), "{kind}");
        assert_eq!(a.stats(), b.stats());
    }
}
