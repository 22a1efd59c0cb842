use crate::cli::utils::ReferenceLog;
use crate::sim::{error::Result, stats::Stats, trace::TraceReader, translator::Simulator};
use std::io::{BufRead, Write};
use tracing::info;

/// Translate every address of `input` in order, writing one result line per
/// reference and then the summary block to `out`.
pub fn run_trace<R, W, L>(
    sim: &mut Simulator,
    input: R,
    out: &mut W,
    mut log: Option<&mut ReferenceLog<L>>,
) -> Result<Stats>
where
    R: BufRead,
    W: Write,
    L: Write,
{
    for va in TraceReader::new(input) {
        let translation = sim.translate(va?)?;
        writeln!(out, "{translation}")?;
        if let Some(log) = log.as_deref_mut() {
            log.record(&translation)?;
        }
    }
    let stats = *sim.stats();
    writeln!(out, "{stats}")?;
    out.flush()?;
    info!(
        references = stats.total_references,
        faults = stats.page_faults,
        "trace finished"
    );
    Ok(stats)
}
