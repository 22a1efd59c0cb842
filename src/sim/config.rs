use crate::policy::replacement::PolicyKind;
use crate::sim::error::{Result, SimError};
use std::path::PathBuf;

/// Largest frame count whose pfns still fit in a 32-bit physical address.
pub const MAX_FRAMES: usize = 1 << 20;

/// A TLB never needs more entries than there are pages in the address space.
pub const MAX_TLB_SIZE: usize = 1 << 20;

pub const USAGE: &str = "Usage: vmsim <total_frames> <tlb_size> <policy> [trace_file] [--csv <path>] [--json]\n       vmsim shell <total_frames> <tlb_size> <policy>\n  policy: FIFO | LRU | LFU | S3FIFO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub total_frames: usize,
    pub tlb_size: usize,
    pub policy: PolicyKind,
}

impl SimConfig {
    pub fn new(total_frames: usize, tlb_size: usize, policy: PolicyKind) -> Result<Self> {
        if total_frames == 0 || total_frames > MAX_FRAMES {
            return Err(SimError::InvalidFrameCount(total_frames));
        }
        if tlb_size > MAX_TLB_SIZE {
            return Err(SimError::InvalidTlbSize(tlb_size));
        }
        Ok(SimConfig {
            total_frames,
            tlb_size,
            policy,
        })
    }

    /// Build from `<total_frames> <tlb_size> <policy>`.
    pub fn from_positional(args: &[String]) -> Result<Self> {
        if args.len() < 3 {
            return Err(SimError::MissingArguments);
        }
        let total_frames = parse_count("total_frames", &args[0])?;
        let tlb_size = parse_count("tlb_size", &args[1])?;
        let policy = args[2].parse()?;
        SimConfig::new(total_frames, tlb_size, policy)
    }
}

/// A batch run as requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub config: SimConfig,
    /// `None` reads the trace from stdin.
    pub trace: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub json: bool,
}

impl RunOptions {
    /// Parse everything after the program name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut positional = Vec::new();
        let mut csv = None;
        let mut json = false;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--csv" => {
                    let path = iter.next().ok_or(SimError::MissingArguments)?;
                    csv = Some(PathBuf::from(path));
                }
                "--json" => json = true,
                flag if flag.starts_with("--") => {
                    return Err(SimError::UnknownFlag(flag.to_string()));
                }
                _ => positional.push(arg.clone()),
            }
        }
        let config = SimConfig::from_positional(&positional)?;
        let trace = match positional.get(3..) {
            Some([path]) => Some(PathBuf::from(path)),
            Some([]) | None => None,
            Some([_, extra, ..]) => return Err(SimError::UnknownFlag(extra.clone())),
        };
        Ok(RunOptions {
            config,
            trace,
            csv,
            json,
        })
    }
}

fn parse_count(name: &'static str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| SimError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}
