//! Instruction decoder.
//!
//! Every 16-bit word is a valid instruction, so decoding cannot fault.

use crate::encoding::{
    Opcode, OpcodeNumbering, IMMEDIATE_MASK, INDIRECT_BIT, OPCODE_MASK, OPCODE_SHIFT,
};

/// Decoded instruction fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedInstruction {
    /// Raw instruction word as fetched.
    pub raw: u16,
    /// Operand is read from memory at `immediate` rather than used as is.
    pub indirect: bool,
    /// Operation selector.
    pub opcode: Opcode,
    /// 12-bit immediate or address field.
    pub immediate: u16,
}

impl DecodedInstruction {
    /// Re-encodes the instruction fields into a word using the listing
    /// numbering.
    #[must_use]
    pub const fn encode(self) -> u16 {
        crate::encoding::encode(self.indirect, self.opcode, self.immediate)
    }

    /// Re-encodes the instruction fields under `numbering`.
    #[must_use]
    pub const fn encode_with(self, numbering: OpcodeNumbering) -> u16 {
        numbering.encode(self.indirect, self.opcode, self.immediate)
    }
}

/// Stateless decoder entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    /// Splits an instruction word into its fields using the listing numbering.
    #[must_use]
    pub const fn decode(word: u16) -> DecodedInstruction {
        Self::decode_with(word, OpcodeNumbering::Listing)
    }

    /// Splits an instruction word into its fields under `numbering`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn decode_with(word: u16, numbering: OpcodeNumbering) -> DecodedInstruction {
        DecodedInstruction {
            raw: word,
            indirect: word & INDIRECT_BIT != 0,
            opcode: numbering.decode(((word >> OPCODE_SHIFT) & OPCODE_MASK) as u8),
            immediate: word & IMMEDIATE_MASK,
        }
    }
}
