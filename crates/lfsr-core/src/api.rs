//! Host-facing configuration and integration contracts.

use std::io;

use crate::encoding::OpcodeNumbering;
use crate::lfsr::{PcMode, DEFAULT_POLYNOMIAL};
use crate::memory::{validate_capacity, DEFAULT_MEMORY_WORDS};
use crate::{ConfigError, Opcode, Registers, RunState};

/// Behaviour of opcode 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LeftOp {
    /// Logical shift left by one.
    #[default]
    Shift,
    /// `a += operand`, wrapping at 16 bits.
    Accumulate,
}

/// Value that the shift opcodes act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ShiftSource {
    /// Shift the freshly fetched operand into `A`.
    #[default]
    Operand,
    /// Shift `A` in place; the operand is ignored.
    Accumulator,
}

/// Immutable configuration for one machine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// LFSR tap mask.
    pub polynomial: u8,
    /// PC advance mode.
    pub pc_mode: PcMode,
    /// Opcode 2 behaviour.
    pub left_op: LeftOp,
    /// Shift opcode input.
    pub shift_source: ShiftSource,
    /// Opcode field assignment.
    pub opcode_numbering: OpcodeNumbering,
    /// Memory capacity in words; a power of two.
    pub memory_words: usize,
    /// PC loaded at reset.
    pub entry_pc: u8,
    /// Emits trace events when a sink is attached.
    pub tracing_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            polynomial: DEFAULT_POLYNOMIAL,
            pc_mode: PcMode::Lfsr,
            left_op: LeftOp::Shift,
            shift_source: ShiftSource::Operand,
            opcode_numbering: OpcodeNumbering::Listing,
            memory_words: DEFAULT_MEMORY_WORDS,
            entry_pc: 0,
            tracing_enabled: false,
        }
    }
}

impl CoreConfig {
    /// Checks the configuration before a machine is built from it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable memory capacity.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        validate_capacity(self.memory_words)
    }
}

/// Character device behind the memory-mapped I/O addresses.
pub trait IoDevice {
    /// Reads the next input character; `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns the device error; the machine treats it as fatal.
    fn read_char(&mut self) -> io::Result<Option<u8>>;

    /// Writes one output character.
    ///
    /// # Errors
    ///
    /// Returns the device error; the machine treats it as fatal.
    fn write_char(&mut self, byte: u8) -> io::Result<()>;
}

impl<D: IoDevice + ?Sized> IoDevice for &mut D {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        (**self).read_char()
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_char(byte)
    }
}

/// Events observed by a [`TraceSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Emitted after decode and before the instruction takes effect.
    Instruction {
        /// Fetch address.
        pc: u8,
        /// Raw instruction word.
        raw: u16,
        /// Operand fetched indirectly.
        indirect: bool,
        /// Decoded operation.
        opcode: Opcode,
        /// Accumulator before execution.
        a: u16,
        /// Zero-based index of this instruction in the run.
        cycle: u64,
    },
    /// Emitted once, on the first store to an I/O address.
    FirstOutput {
        /// Cycle index of that store.
        cycles: u64,
    },
}

/// Receiver for trace events. Failures abort the run.
pub trait TraceSink {
    /// Records an event in execution order.
    ///
    /// # Errors
    ///
    /// Returns the sink's write error.
    fn on_event(&mut self, event: &TraceEvent) -> io::Result<()>;
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: &TraceEvent) -> io::Result<()> {
        self.push(*event);
        Ok(())
    }
}

/// Loop control returned by a successful step. A fault is the `Err` side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The instruction retired; the loop continues.
    Continue,
    /// A self-referential `JMP` stopped the machine.
    Halted,
}

/// Result of running a machine for many steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions executed by this call, including a halting `JMP`.
    pub steps: u64,
    /// True when the run ended on the halt sentinel.
    pub halted: bool,
    /// Registers after the last step.
    pub registers: Registers,
}

/// Full machine state for inspection and fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineSnapshot {
    /// Register file.
    pub registers: Registers,
    /// Instructions executed since reset.
    pub cycles: u64,
    /// First-output diagnostic still pending.
    pub first_output_pending: bool,
    /// Lifecycle state.
    pub run_state: RunState,
    /// Memory image.
    pub memory: Vec<u16>,
}
