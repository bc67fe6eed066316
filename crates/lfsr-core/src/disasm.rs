//! Program listings.
//!
//! Because the PC follows the LFSR, a listing in address order says little
//! about control flow. [`disassemble_sequence`] lists instructions in the
//! order the sequencer visits them instead.

use std::fmt;

use crate::api::CoreConfig;
use crate::lfsr::Sequence;
use crate::memory::Memory;
use crate::{DecodedInstruction, Decoder, OpcodeNumbering};

/// A single disassembled instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisassemblyRow {
    /// Address the word was read from.
    pub addr: u8,
    /// Decoded fields.
    pub instruction: DecodedInstruction,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instr = self.instruction;
        let mode = if instr.indirect { "@" } else { "" };
        write!(
            f,
            "{:02x}: {:04x}  {:<5} {mode}{:03x}",
            self.addr,
            instr.raw,
            instr.opcode.mnemonic(),
            instr.immediate
        )?;
        if instr.opcode.is_jump() && !instr.indirect {
            write!(f, "  ; -> {:02x}", instr.immediate & 0xFF)?;
        }
        Ok(())
    }
}

/// Decodes one word at `addr` under `numbering`.
#[must_use]
pub const fn disassemble_word(
    addr: u8,
    word: u16,
    numbering: OpcodeNumbering,
) -> DisassemblyRow {
    DisassemblyRow {
        addr,
        instruction: Decoder::decode_with(word, numbering),
    }
}

/// Lists `count` instructions in fetch order starting at the entry PC,
/// assuming no jump is taken.
#[must_use]
pub fn disassemble_sequence(
    memory: &Memory,
    config: &CoreConfig,
    count: usize,
) -> Vec<DisassemblyRow> {
    Sequence::new(config.entry_pc, config.polynomial, config.pc_mode)
        .take(count)
        .map(|addr| {
            disassemble_word(
                addr,
                memory.read(u16::from(addr)),
                config.opcode_numbering,
            )
        })
        .collect()
}
