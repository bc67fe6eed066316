use std::io;

use thiserror::Error;

use crate::state::RunState;

/// Copyable fault category latched into [`RunState::Faulted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultKind {
    /// The input device failed while servicing a `LOAD`.
    DeviceRead,
    /// The output device failed while servicing a `STORE`.
    DeviceWrite,
    /// The trace sink failed to record a line.
    TraceWrite,
}

/// Rejected machine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// Memory capacity must be a non-zero power of two.
    #[error("memory capacity {0} is not a non-zero power of two")]
    CapacityNotPowerOfTwo(usize),
    /// Memory capacity exceeds the 16-bit address space.
    #[error("memory capacity {0} exceeds the 65536-word address space")]
    CapacityTooLarge(usize),
}

/// Fatal conditions raised while stepping a machine.
#[derive(Debug, Error)]
pub enum MachineError {
    /// Input device failure.
    #[error("input device read failed at pc {pc}")]
    DeviceRead {
        /// PC of the faulting instruction.
        pc: u8,
        /// Underlying device error.
        #[source]
        source: io::Error,
    },
    /// Output device failure.
    #[error("output device write failed at pc {pc}")]
    DeviceWrite {
        /// PC of the faulting instruction.
        pc: u8,
        /// Underlying device error.
        #[source]
        source: io::Error,
    },
    /// Trace sink failure.
    #[error("trace write failed at pc {pc}")]
    TraceWrite {
        /// PC of the instruction being traced.
        pc: u8,
        /// Underlying sink error.
        #[source]
        source: io::Error,
    },
    /// The machine already halted or faulted and cannot step again.
    #[error("machine is no longer running ({0:?})")]
    Terminated(RunState),
}

impl MachineError {
    /// Returns the latched fault category, or `None` for [`Self::Terminated`].
    #[must_use]
    pub const fn kind(&self) -> Option<FaultKind> {
        match self {
            Self::DeviceRead { .. } => Some(FaultKind::DeviceRead),
            Self::DeviceWrite { .. } => Some(FaultKind::DeviceWrite),
            Self::TraceWrite { .. } => Some(FaultKind::TraceWrite),
            Self::Terminated(_) => None,
        }
    }

    /// PC of the instruction that raised the fault, when known.
    #[must_use]
    pub const fn pc(&self) -> Option<u8> {
        match self {
            Self::DeviceRead { pc, .. }
            | Self::DeviceWrite { pc, .. }
            | Self::TraceWrite { pc, .. } => Some(*pc),
            Self::Terminated(_) => None,
        }
    }
}
