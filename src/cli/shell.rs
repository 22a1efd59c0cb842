use crate::memory::address::parse_address;
use crate::sim::{
    config::SimConfig,
    error::{Result as SimResult, SimError},
    translator::Simulator,
};
use anyhow::Result;
use rustyline::{Editor, error::ReadlineError};

/// What the shell should do after one input line.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Nothing,
    Exit,
}

/// Evaluate one shell line: a hex address, `stats`, or `exit`/`quit`.
pub fn eval_line(sim: &mut Simulator, line: &str, line_no: usize) -> SimResult<Reply> {
    let cmd = line.trim();
    if cmd.is_empty() {
        return Ok(Reply::Nothing);
    }
    if cmd.eq_ignore_ascii_case("exit") || cmd.eq_ignore_ascii_case("quit") {
        return Ok(Reply::Exit);
    }
    if cmd.eq_ignore_ascii_case("stats") {
        return Ok(Reply::Print(sim.stats().to_string()));
    }
    let va = parse_address(cmd, line_no)?;
    Ok(Reply::Print(sim.translate(va)?.to_string()))
}

pub fn run_shell(config: SimConfig) -> Result<()> {
    println!(
        "vmsim: {} frames, {} TLB entries, {} replacement. Type hex addresses, 'stats', or 'exit'.",
        config.total_frames, config.tlb_size, config.policy
    );
    let mut sim = Simulator::new(config);
    let mut rl = Editor::<()>::new()?;
    let mut line_no = 0;
    loop {
        match rl.readline("va> ") {
            Ok(line) => {
                line_no += 1;
                rl.add_history_entry(line.as_str());
                match eval_line(&mut sim, &line, line_no) {
                    Ok(Reply::Print(text)) => println!("{text}"),
                    Ok(Reply::Nothing) => {}
                    Ok(Reply::Exit) => break,
                    Err(e @ SimError::MalformedAddress { .. }) => println!("Error: {e}"),
                    Err(e) => return Err(e.into()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    println!("{}", sim.stats());
    Ok(())
}
