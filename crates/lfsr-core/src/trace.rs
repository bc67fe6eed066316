//! Text trace in the format the VHDL test bench logs.
//!
//! One line per instruction, written before the instruction executes:
//!
//! ```text
//! 1: - a_xor 0
//! 184: i a_store 5
//! Cycles until first output: 1
//! ```

use std::io::{self, Write};

use crate::api::{TraceEvent, TraceSink};

/// Line layout for instruction events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraceFormat {
    /// `pc: mode a_mnemonic a`, matching the test bench.
    #[default]
    Compact,
    /// Compact line followed by the raw word in hex and the cycle index.
    Extended,
}

/// Trace sink that formats events onto a writer.
#[derive(Debug)]
pub struct TextTrace<W: Write> {
    out: W,
    format: TraceFormat,
}

impl<W: Write> TextTrace<W> {
    /// Wraps a writer using the compact format.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            format: TraceFormat::Compact,
        }
    }

    /// Wraps a writer using the given format.
    pub const fn with_format(out: W, format: TraceFormat) -> Self {
        Self { out, format }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for TextTrace<W> {
    fn on_event(&mut self, event: &TraceEvent) -> io::Result<()> {
        match *event {
            TraceEvent::Instruction {
                pc,
                raw,
                indirect,
                opcode,
                a,
                cycle,
            } => {
                let mode = if indirect { 'i' } else { '-' };
                match self.format {
                    TraceFormat::Compact => {
                        writeln!(self.out, "{pc}: {mode} a_{} {a}", opcode.mnemonic())
                    }
                    TraceFormat::Extended => writeln!(
                        self.out,
                        "{pc}: {mode} a_{} {a} {raw:04x} {cycle}",
                        opcode.mnemonic()
                    ),
                }
            }
            TraceEvent::FirstOutput { cycles } => {
                writeln!(self.out, "Cycles until first output: {cycles}")
            }
        }
    }
}
