//! Instruction word layout and the opcode table.
//!
//! ```text
//!  15  14..12   11..0
//! +---+------+---------+
//! | I |  OP  |   IMM   |
//! +---+------+---------+
//! ```
//!
//! `I` selects indirect operand fetch, `OP` picks one of eight operations and
//! `IMM` is the 12-bit immediate or address.

/// Bit that selects indirect operand fetch.
pub const INDIRECT_BIT: u16 = 0x8000;
/// Shift that moves the opcode field to bits `2..0`.
pub const OPCODE_SHIFT: u16 = 12;
/// Mask of the opcode field after shifting.
pub const OPCODE_MASK: u16 = 0x7;
/// Mask of the 12-bit immediate field.
pub const IMMEDIATE_MASK: u16 = 0x0FFF;

/// The eight accumulator operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// `a &= operand`.
    And = 0,
    /// `a ^= operand`.
    Xor = 1,
    /// Shift left by one, or add when configured to accumulate.
    Lsl1 = 2,
    /// Logical shift right by one.
    Lsr1 = 3,
    /// Load from memory or the input device.
    Load = 4,
    /// Store to memory or the output device.
    Store = 5,
    /// Unconditional jump to the low 8 bits of the operand.
    ///
    /// Halts when the full 16-bit operand equals the current PC, so a target
    /// above 255 that aliases the current PC jumps back to it instead.
    Jmp = 6,
    /// Jump when the accumulator is zero.
    Jmpz = 7,
}

/// Listing-order opcode numbering and the mnemonics printed by the tracer.
pub const OPCODE_TABLE: [(u8, Opcode, &str); 8] = [
    (0, Opcode::And, "and"),
    (1, Opcode::Xor, "xor"),
    (2, Opcode::Lsl1, "lsl1"),
    (3, Opcode::Lsr1, "lsr1"),
    (4, Opcode::Load, "load"),
    (5, Opcode::Store, "store"),
    (6, Opcode::Jmp, "jmp"),
    (7, Opcode::Jmpz, "jmpz"),
];

impl Opcode {
    /// Decodes the 3-bit opcode field. Every value is assigned.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Self {
        match bits & 0x7 {
            0 => Self::And,
            1 => Self::Xor,
            2 => Self::Lsl1,
            3 => Self::Lsr1,
            4 => Self::Load,
            5 => Self::Store,
            6 => Self::Jmp,
            _ => Self::Jmpz,
        }
    }

    /// Returns the 3-bit field value.
    #[must_use]
    pub const fn as_u3(self) -> u8 {
        self as u8
    }

    /// Lower-case mnemonic used in trace lines and listings.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        OPCODE_TABLE[self as usize].2
    }

    /// Returns true for opcodes that can write to the PC directly.
    #[must_use]
    pub const fn is_jump(self) -> bool {
        matches!(self, Self::Jmp | Self::Jmpz)
    }

    const fn swap_logical(self) -> Self {
        match self {
            Self::And => Self::Xor,
            Self::Xor => Self::And,
            other => other,
        }
    }
}

/// Assignment of opcode field values to operations.
///
/// The two numberings differ only in fields 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum OpcodeNumbering {
    /// `0 and, 1 xor`, the order of [`OPCODE_TABLE`].
    #[default]
    Listing,
    /// `0 xor, 1 and`, as used by the reference C model and the VHDL core.
    Reference,
}

impl OpcodeNumbering {
    /// Decodes a 3-bit opcode field under this numbering.
    #[must_use]
    pub const fn decode(self, bits: u8) -> Opcode {
        let opcode = Opcode::from_u3(bits);
        match self {
            Self::Listing => opcode,
            Self::Reference => opcode.swap_logical(),
        }
    }

    /// Returns the 3-bit field value of `opcode` under this numbering.
    #[must_use]
    pub const fn field(self, opcode: Opcode) -> u8 {
        match self {
            Self::Listing => opcode.as_u3(),
            Self::Reference => opcode.swap_logical().as_u3(),
        }
    }

    /// Builds an instruction word under this numbering.
    #[must_use]
    pub const fn encode(self, indirect: bool, opcode: Opcode, immediate: u16) -> u16 {
        encode(indirect, self.decode(opcode.as_u3()), immediate)
    }
}

/// Builds an instruction word from its fields using the listing numbering.
///
/// The immediate is truncated to 12 bits.
#[must_use]
pub const fn encode(indirect: bool, opcode: Opcode, immediate: u16) -> u16 {
    let flag = if indirect { INDIRECT_BIT } else { 0 };
    flag | ((opcode as u16) << OPCODE_SHIFT) | (immediate & IMMEDIATE_MASK)
}
