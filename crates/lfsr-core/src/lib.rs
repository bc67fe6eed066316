//! Core simulator for the 16-bit accumulator machine with an LFSR program counter.

/// Program-counter sequencer.
pub mod lfsr;
pub use lfsr::{cycle_length, next_pc, PcMode, Sequence, DEFAULT_POLYNOMIAL, PC_MASK};

/// Instruction word layout and opcode table.
pub mod encoding;
pub use encoding::{
    encode, Opcode, OpcodeNumbering, IMMEDIATE_MASK, INDIRECT_BIT, OPCODE_TABLE,
};

/// Instruction decoder.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder};

/// Word memory and program image loading.
pub mod memory;
pub use memory::{
    is_io_address, load_hex, LoadReport, LoadStop, Memory, DEFAULT_MEMORY_WORDS, IO_ADDRESS_BIT,
    MAX_MEMORY_WORDS,
};

/// Fault and configuration error types.
pub mod fault;
pub use fault::{ConfigError, FaultKind, MachineError};

/// Architectural state and run-state machine.
pub mod state;
pub use state::{Registers, RunState};

/// Configuration, device and trace contracts.
pub mod api;
pub use api::{
    CoreConfig, IoDevice, LeftOp, MachineSnapshot, RunOutcome, ShiftSource, StepOutcome,
    TraceEvent, TraceSink,
};

/// Machine ownership and run loop.
pub mod machine;
pub use machine::{Machine, NoTrace};

/// Single-step execution.
pub mod execute;
pub use execute::END_OF_INPUT;

/// Test-bench text trace.
pub mod trace;
pub use trace::{TextTrace, TraceFormat};

/// Character devices.
pub mod peripherals;
pub use peripherals::{BufferDevice, StreamDevice};

/// Program listings.
pub mod disasm;
pub use disasm::{disassemble_sequence, disassemble_word, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use serde_json as _;
