use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing_subscriber::EnvFilter;
use vmsim::{
    cli::{
        shell::run_shell,
        utils::{ReferenceLog, summary_json},
    },
    sim::{
        config::{RunOptions, SimConfig, USAGE},
        error::SimError,
        runner::run_trace,
        translator::Simulator,
    },
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VMSIM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("shell") {
        let config = SimConfig::from_positional(&args[2..]).unwrap_or_else(|e| config_exit(e));
        return run_shell(config);
    }
    let opts = RunOptions::from_args(&args[1..]).unwrap_or_else(|e| config_exit(e));

    let input: Box<dyn BufRead> = match &opts.trace {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening trace {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut log = opts
        .csv
        .as_ref()
        .map(|path| ReferenceLog::<File>::create(path))
        .transpose()?;

    let mut sim = Simulator::new(opts.config.clone());
    let mut out = BufWriter::new(io::stdout().lock());
    let stats = run_trace(&mut sim, input, &mut out, log.as_mut())?;
    if let Some(log) = log {
        log.finish()?;
    }
    if opts.json {
        writeln!(out, "{}", summary_json(&opts.config, &stats)?)?;
    }
    out.flush()?;
    Ok(())
}

fn config_exit(err: SimError) -> ! {
    match err {
        SimError::MissingArguments => eprintln!("{USAGE}"),
        other => eprintln!("Error: {other}\n{USAGE}"),
    }
    std::process::exit(1);
}
