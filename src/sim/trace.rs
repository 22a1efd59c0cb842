use crate::memory::address::{VirtualAddress, parse_address};
use crate::sim::error::{Result, SimError};
use std::io::{BufRead, ErrorKind, Lines};

/// Yields the addresses of a newline-delimited hex trace, skipping blank
/// lines. A bad line ends the iteration with an error.
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        TraceReader {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<VirtualAddress>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    return Some(Err(SimError::MalformedAddress {
                        line: self.line_no + 1,
                        token: "<invalid utf-8>".to_string(),
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_address(&line, self.line_no));
        }
    }
}
