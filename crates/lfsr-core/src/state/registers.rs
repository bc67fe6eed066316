use crate::lfsr::PC_MASK;

/// The two architectural registers.
///
/// `PC` is an 8-bit quantity in hardware. It is stored as `u8` and every
/// wider value written through [`Registers::set_pc_from_word`] is masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    pc: u8,
    a: u16,
}

impl Registers {
    /// Creates a register file with the given reset PC and a cleared accumulator.
    #[must_use]
    pub const fn with_entry(pc: u8) -> Self {
        Self { pc, a: 0 }
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u8 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u8) {
        self.pc = value;
    }

    /// Writes the program counter from a 16-bit jump target, keeping the low byte.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn set_pc_from_word(&mut self, value: u16) {
        self.pc = (value & PC_MASK) as u8;
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn a(&self) -> u16 {
        self.a
    }

    /// Writes the accumulator.
    pub const fn set_a(&mut self, value: u16) {
        self.a = value;
    }
}
