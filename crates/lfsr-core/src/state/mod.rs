//! Architectural state and the run-state machine.

/// Register file (`PC`, `A`).
pub mod registers;

pub use registers::Registers;
use crate::FaultKind;

/// Lifecycle of one machine run.
///
/// `Halted` and `Faulted` are terminal; a machine never leaves them except
/// through an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Registers cleared, memory loaded externally, nothing executed yet.
    #[default]
    Reset,
    /// At least one instruction has executed and the loop may continue.
    Running,
    /// A self-referential `JMP` was executed.
    Halted,
    /// A device or trace failure aborted the run.
    Faulted(FaultKind),
}

impl RunState {
    /// Returns true when no further instruction may execute.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted | Self::Faulted(_))
    }

    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn fault(self) -> Option<FaultKind> {
        match self {
            Self::Faulted(kind) => Some(kind),
            Self::Reset | Self::Running | Self::Halted => None,
        }
    }
}
