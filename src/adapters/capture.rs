//! JSON-lines capture files.
//!
//! One record per line. Messages are `{"id":37,"args":{...}}`; transport
//! faults are `{"fault":"interrupted"}` (`invalid`, `interrupted`,
//! `terminated`, anything else is kept verbatim). Blank lines and lines
//! starting with `#` are skipped.

use std::io::{self, BufRead, Write};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::wire::{Inbound, Message, Transport, TransportFault};

#[derive(Deserialize)]
#[serde(untagged)]
enum Record {
    Fault { fault: String },
    Message(Message),
}

impl From<Record> for Inbound {
    fn from(record: Record) -> Self {
        match record {
            Record::Message(m) => Self::Message(m),
            Record::Fault { fault } => Self::Fault(match fault.as_str() {
                "invalid" => TransportFault::Invalid,
                "interrupted" => TransportFault::Interrupted,
                "terminated" => TransportFault::Terminated,
                _ => TransportFault::Other(fault),
            }),
        }
    }
}

/// Parse a single capture line. `line_no` is 1-based, for error reports.
pub fn parse_line(line: &str, line_no: usize) -> Result<Inbound> {
    serde_json::from_str::<Record>(line)
        .map(Inbound::from)
        .map_err(|source| Error::Capture {
            line: line_no,
            source,
        })
}

/// Iterate over every record of a capture.
pub fn read_capture<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Inbound>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Err(e) => Some(Err(Error::Io(e))),
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    None
                } else {
                    Some(parse_line(trimmed, i + 1))
                }
            }
        })
}

/// Transport that appends every outgoing message to a JSON-lines writer.
pub struct CaptureTransport<W> {
    out: W,
}

impl<W: Write> CaptureTransport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Transport for CaptureTransport<W> {
    type Error = io::Error;

    fn send(&mut self, message: &Message) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
