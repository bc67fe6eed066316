//! Fetch, decode and execute of a single instruction.
//!
//! Order within one step:
//! 1. Fetch the word at `PC`
//! 2. Decode and fetch the operand (indirect operands never touch I/O)
//! 3. Compute the sequencer's next `PC`
//! 4. Emit the trace line
//! 5. Dispatch on the opcode, performing any device access
//! 6. Write `PC`

pub mod alu;

use crate::api::{IoDevice, StepOutcome, TraceEvent, TraceSink};
use crate::lfsr::next_pc;
use crate::memory::is_io_address;
use crate::{DecodedInstruction, Decoder, Machine, MachineError, Opcode, RunState};

/// Value a `LOAD` from the input device yields at end of stream.
pub const END_OF_INPUT: u16 = 0xFFFF;

impl<D: IoDevice, T: TraceSink> Machine<D, T> {
    /// Executes one instruction.
    ///
    /// `Ok(StepOutcome::Halted)` leaves `PC` and `A` at their pre-halt values.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::Terminated`] once the machine has halted or
    /// faulted, and the device or trace error that faults it otherwise.
    pub fn step(&mut self) -> Result<StepOutcome, MachineError> {
        if self.run_state.is_terminal() {
            return Err(MachineError::Terminated(self.run_state));
        }
        self.run_state = RunState::Running;

        let result = self.execute_next();
        self.cycles += 1;

        match result {
            Ok(StepOutcome::Halted) => {
                self.run_state = RunState::Halted;
                tracing::info!(
                    pc = self.registers.pc(),
                    a = self.registers.a(),
                    cycles = self.cycles,
                    "halt sentinel reached"
                );
                Ok(StepOutcome::Halted)
            }
            Ok(StepOutcome::Continue) => Ok(StepOutcome::Continue),
            Err(error) => {
                if let Some(kind) = error.kind() {
                    self.run_state = RunState::Faulted(kind);
                }
                tracing::error!(%error, cycles = self.cycles, "machine faulted");
                Err(error)
            }
        }
    }

    /// Fetches and decodes the instruction at the current `PC`.
    #[must_use]
    pub fn fetch(&self) -> DecodedInstruction {
        let word = self.memory.read(u16::from(self.registers.pc()));
        Decoder::decode_with(word, self.config.opcode_numbering)
    }

    fn execute_next(&mut self) -> Result<StepOutcome, MachineError> {
        let pc = self.registers.pc();
        let a = self.registers.a();
        let instr = self.fetch();
        let operand = if instr.indirect {
            self.memory.read(instr.immediate)
        } else {
            instr.immediate
        };
        let advanced_pc = next_pc(pc, self.config.polynomial, self.config.pc_mode);

        self.emit(
            pc,
            &TraceEvent::Instruction {
                pc,
                raw: instr.raw,
                indirect: instr.indirect,
                opcode: instr.opcode,
                a,
                cycle: self.cycles,
            },
        )?;

        match instr.opcode {
            Opcode::And => self.registers.set_a(alu::and(a, operand)),
            Opcode::Xor => self.registers.set_a(alu::xor(a, operand)),
            Opcode::Lsl1 => self.registers.set_a(alu::shift_left(
                a,
                operand,
                self.config.left_op,
                self.config.shift_source,
            )),
            Opcode::Lsr1 => {
                self.registers
                    .set_a(alu::shift_right(a, operand, self.config.shift_source));
            }
            Opcode::Load => {
                let value = self.load(pc, operand)?;
                self.registers.set_a(value);
            }
            Opcode::Store => self.store(pc, operand, a)?,
            Opcode::Jmp => {
                if operand == u16::from(pc) {
                    return Ok(StepOutcome::Halted);
                }
                self.registers.set_pc_from_word(operand);
                return Ok(StepOutcome::Continue);
            }
            Opcode::Jmpz => {
                if a == 0 {
                    self.registers.set_pc_from_word(operand);
                } else {
                    self.registers.set_pc(advanced_pc);
                }
                return Ok(StepOutcome::Continue);
            }
        }

        self.registers.set_pc(advanced_pc);
        Ok(StepOutcome::Continue)
    }

    fn load(&mut self, pc: u8, addr: u16) -> Result<u16, MachineError> {
        if !is_io_address(addr) {
            return Ok(self.memory.read(addr));
        }
        match self.device.read_char() {
            Ok(Some(byte)) => Ok(u16::from(byte)),
            Ok(None) => Ok(END_OF_INPUT),
            Err(source) => Err(MachineError::DeviceRead { pc, source }),
        }
    }

    fn store(&mut self, pc: u8, addr: u16, value: u16) -> Result<(), MachineError> {
        if !is_io_address(addr) {
            self.memory.write(addr, value);
            return Ok(());
        }
        if self.first_output_pending {
            self.first_output_pending = false;
            self.emit(pc, &TraceEvent::FirstOutput { cycles: self.cycles })?;
        }
        let [low, _] = value.to_le_bytes();
        self.device
            .write_char(low)
            .map_err(|source| MachineError::DeviceWrite { pc, source })
    }

    fn emit(&mut self, pc: u8, event: &TraceEvent) -> Result<(), MachineError> {
        if !self.config.tracing_enabled {
            return Ok(());
        }
        self.trace
            .on_event(event)
            .map_err(|source| MachineError::TraceWrite { pc, source })
    }
}
