use std::collections::VecDeque;
use std::io;

use crate::api::IoDevice;

/// Device backed by an input queue and an output buffer.
///
/// Counts accesses so tests can check I/O routing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDevice {
    input: VecDeque<u8>,
    output: Vec<u8>,
    reads: usize,
    fail_reads: bool,
    fail_writes: bool,
}

impl BufferDevice {
    /// Creates a device that will read `input` in order.
    #[must_use]
    pub fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Creates a device whose reads always fail.
    #[must_use]
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// Creates a device whose writes always fail.
    #[must_use]
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Characters written so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Number of `read_char` calls so far, including reads at end of stream.
    #[must_use]
    pub const fn reads(&self) -> usize {
        self.reads
    }

    /// Number of input characters not yet consumed.
    #[must_use]
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl IoDevice for BufferDevice {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        self.reads += 1;
        if self.fail_reads {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(self.input.pop_front())
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.output.push(byte);
        Ok(())
    }
}
