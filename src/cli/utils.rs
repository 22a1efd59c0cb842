use crate::policy::replacement::PolicyKind;
use crate::sim::{
    config::SimConfig,
    error::Result,
    stats::Stats,
    translator::{Translation, TranslationRecord},
};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Per-reference CSV log: one header row, then one row per translation.
pub struct ReferenceLog<W: Write> {
    wtr: Writer<W>,
}

impl ReferenceLog<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(ReferenceLog {
            wtr: WriterBuilder::new().from_path(path)?,
        })
    }
}

impl<W: Write> ReferenceLog<W> {
    pub fn from_writer(writer: W) -> Self {
        ReferenceLog {
            wtr: WriterBuilder::new().from_writer(writer),
        }
    }

    pub fn record(&mut self, translation: &Translation) -> Result<()> {
        self.wtr.serialize(TranslationRecord::from(translation))?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.wtr.flush()?;
        self.wtr
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    total_frames: usize,
    tlb_size: usize,
    policy: PolicyKind,
    #[serde(flatten)]
    stats: &'a Stats,
    tlb_hit_ratio: f64,
    page_fault_rate: f64,
}

/// Machine-readable summary of a finished run.
pub fn summary_json(config: &SimConfig, stats: &Stats) -> Result<String> {
    let summary = SummaryJson {
        total_frames: config.total_frames,
        tlb_size: config.tlb_size,
        policy: config.policy,
        stats,
        tlb_hit_ratio: stats.tlb_hit_ratio(),
        page_fault_rate: stats.page_fault_rate(),
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}
