//! Machine ownership and the run loop.

use std::io::{self, Read};

use crate::api::{
    CoreConfig, IoDevice, MachineSnapshot, RunOutcome, StepOutcome, TraceEvent, TraceSink,
};
use crate::memory::{load_hex, LoadReport, Memory};
use crate::{ConfigError, MachineError, Registers, RunState};

/// Trace sink that discards every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn on_event(&mut self, _event: &TraceEvent) -> io::Result<()> {
        Ok(())
    }
}

/// One simulated processor with its memory, device and optional trace sink.
#[derive(Debug)]
pub struct Machine<D: IoDevice, T: TraceSink = NoTrace> {
    pub(crate) config: CoreConfig,
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    pub(crate) device: D,
    pub(crate) trace: T,
    pub(crate) run_state: RunState,
    pub(crate) cycles: u64,
    pub(crate) first_output_pending: bool,
}

impl<D: IoDevice> Machine<D> {
    /// Builds a machine in the `Reset` state with zeroed memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is rejected.
    pub fn new(config: CoreConfig, device: D) -> Result<Self, ConfigError> {
        config.validate()?;
        let memory = Memory::new(config.memory_words)?;
        Ok(Self {
            registers: Registers::with_entry(config.entry_pc),
            config,
            memory,
            device,
            trace: NoTrace,
            run_state: RunState::Reset,
            cycles: 0,
            first_output_pending: true,
        })
    }
}

impl<D: IoDevice, T: TraceSink> Machine<D, T> {
    /// Replaces the trace sink. Events are emitted only when
    /// [`CoreConfig::tracing_enabled`] is set.
    pub fn with_trace<U: TraceSink>(self, trace: U) -> Machine<D, U> {
        Machine {
            config: self.config,
            memory: self.memory,
            registers: self.registers,
            device: self.device,
            trace,
            run_state: self.run_state,
            cycles: self.cycles,
            first_output_pending: self.first_output_pending,
        }
    }

    /// Loads a hex program image at address 0.
    ///
    /// # Errors
    ///
    /// Returns the reader's error; malformed text only truncates the load.
    pub fn load_image<R: Read>(&mut self, reader: R) -> io::Result<LoadReport> {
        load_hex(reader, &mut self.memory)
    }

    /// Restores reset register values, the cycle counter and the
    /// first-output marker. Memory is kept.
    pub fn reset(&mut self) {
        self.registers = Registers::with_entry(self.config.entry_pc);
        self.run_state = RunState::Reset;
        self.cycles = 0;
        self.first_output_pending = true;
        tracing::debug!(entry_pc = self.config.entry_pc, "machine reset");
    }

    /// Runs until the halt sentinel.
    ///
    /// # Errors
    ///
    /// Returns the first fault; the machine is left in `Faulted`.
    pub fn run(&mut self) -> Result<RunOutcome, MachineError> {
        self.run_until(None)
    }

    /// Runs at most `max_steps` instructions.
    ///
    /// # Errors
    ///
    /// Returns the first fault; the machine is left in `Faulted`.
    pub fn run_for(&mut self, max_steps: u64) -> Result<RunOutcome, MachineError> {
        self.run_until(Some(max_steps))
    }

    fn run_until(&mut self, limit: Option<u64>) -> Result<RunOutcome, MachineError> {
        let mut steps = 0u64;
        let mut halted = false;
        while limit.is_none_or(|max| steps < max) {
            let outcome = self.step()?;
            steps += 1;
            if outcome == StepOutcome::Halted {
                halted = true;
                break;
            }
        }
        Ok(RunOutcome {
            steps,
            halted,
            registers: self.registers,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> Registers {
        self.registers
    }

    /// Mutable register file, for harnesses that seed state.
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Backing memory.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable backing memory, for pre-loading programs.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Attached device.
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Attached trace sink.
    #[must_use]
    pub const fn trace(&self) -> &T {
        &self.trace
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Instructions executed since reset.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// True until the first store to an I/O address.
    #[must_use]
    pub const fn first_output_pending(&self) -> bool {
        self.first_output_pending
    }

    /// Copies out the full architectural state.
    #[must_use]
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            registers: self.registers,
            cycles: self.cycles,
            first_output_pending: self.first_output_pending,
            run_state: self.run_state,
            memory: self.memory.as_slice().to_vec(),
        }
    }

    /// Splits the machine into its device and trace sink.
    pub fn into_parts(self) -> (D, T) {
        (self.device, self.trace)
    }
}

#[cfg(test)]
mod tests {
    use super::{Machine, NoTrace};
    use crate::api::CoreConfig;
    use crate::peripherals::BufferDevice;
    use crate::{ConfigError, RunState};

    #[test]
    fn new_machine_starts_in_reset_at_entry_pc() {
        let config = CoreConfig {
            entry_pc: 1,
            ..CoreConfig::default()
        };
        let machine = Machine::new(config, BufferDevice::default()).expect("valid config");
        assert_eq!(machine.run_state(), RunState::Reset);
        assert_eq!(machine.registers().pc(), 1);
        assert_eq!(machine.registers().a(), 0);
        assert_eq!(machine.cycles(), 0);
        assert!(machine.first_output_pending());
        assert_eq!(machine.memory().capacity(), 0x1000);
        assert_eq!(*machine.trace(), NoTrace);
    }

    #[test]
    fn new_rejects_invalid_capacity() {
        let config = CoreConfig {
            memory_words: 100,
            ..CoreConfig::default()
        };
        let error = Machine::new(config, BufferDevice::default()).expect_err("invalid capacity");
        assert_eq!(error, ConfigError::CapacityNotPowerOfTwo(100));
    }

    #[test]
    fn load_image_fills_memory_from_zero() {
        let mut machine =
            Machine::new(CoreConfig::default(), BufferDevice::default()).expect("valid config");
        let report = machine
            .load_image("6001\n1005,".as_bytes())
            .expect("in-memory read");
        assert_eq!(report.words, 2);
        assert_eq!(&machine.memory().as_slice()[..3], &[0x6001, 0x1005, 0]);
    }

    #[test]
    fn snapshot_copies_memory_and_registers() {
        let mut machine =
            Machine::new(CoreConfig::default(), BufferDevice::default()).expect("valid config");
        machine.memory_mut().write(2, 0xABCD);
        machine.registers_mut().set_a(9);
        let snapshot = machine.snapshot();
        assert_eq!(snapshot.registers.a(), 9);
        assert_eq!(snapshot.memory[2], 0xABCD);
        assert_eq!(snapshot.memory.len(), 0x1000);
        assert_eq!(snapshot.run_state, RunState::Reset);
        assert!(snapshot.first_output_pending);
    }
}
