//! Property coverage for the sequencer, ALU and memory/I-O routing.

use lfsr_core::{
    cycle_length, encode, next_pc, BufferDevice, CoreConfig, Machine, Opcode, PcMode, StepOutcome,
    DEFAULT_POLYNOMIAL,
};
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use serde_json as _;
use thiserror as _;
use tracing as _;

fn increment_machine(input: &[u8]) -> Machine<BufferDevice> {
    let config = CoreConfig {
        pc_mode: PcMode::Increment,
        ..CoreConfig::default()
    };
    Machine::new(config, BufferDevice::with_input(input)).expect("valid config")
}

/// Runs a single instruction at address 0 with `a` preloaded and the operand
/// stored indirectly at `0x100`.
fn run_alu(opcode: Opcode, a: u16, operand: u16) -> u16 {
    let mut machine = increment_machine(b"");
    machine.memory_mut().write(0, encode(true, opcode, 0x100));
    machine.memory_mut().write(0x100, operand);
    machine.registers_mut().set_a(a);
    machine.step().expect("alu step");
    machine.registers().a()
}

proptest! {
    #[test]
    fn sequencer_is_closed_and_deterministic(seed in any::<u8>(), mask in any::<u8>()) {
        let first = next_pc(seed, mask, PcMode::Lfsr);
        prop_assert_eq!(first, next_pc(seed, mask, PcMode::Lfsr));
        prop_assert_eq!(next_pc(seed, mask, PcMode::Increment), seed.wrapping_add(1));
    }

    #[test]
    fn default_polynomial_has_maximal_period(seed in 1u8..=255) {
        prop_assert_eq!(cycle_length(seed, DEFAULT_POLYNOMIAL, PcMode::Lfsr), Some(255));
    }

    #[test]
    fn logical_ops_are_bitwise(a in any::<u16>(), b in any::<u16>()) {
        prop_assert_eq!(run_alu(Opcode::And, a, b), a & b);
        prop_assert_eq!(run_alu(Opcode::Xor, a, b), a ^ b);
    }

    #[test]
    fn logical_ops_ignore_pc(a in any::<u16>(), b in any::<u16>(), pc in any::<u8>()) {
        let mut machine = increment_machine(b"");
        machine.memory_mut().write(u16::from(pc), encode(true, Opcode::Xor, 0x100));
        machine.memory_mut().write(0x100, b);
        machine.registers_mut().set_pc(pc);
        machine.registers_mut().set_a(a);
        machine.step().expect("xor step");
        prop_assert_eq!(machine.registers().a(), a ^ b);
        prop_assert_eq!(machine.registers().pc(), pc.wrapping_add(1));
    }

    #[test]
    fn store_then_load_round_trips(addr in 0x0100u16..0x1000, value in any::<u16>()) {
        let mut machine = increment_machine(b"");
        machine.memory_mut().write(0, encode(true, Opcode::Store, 0x0F0));
        machine.memory_mut().write(1, encode(false, Opcode::And, 0));
        machine.memory_mut().write(2, encode(true, Opcode::Load, 0x0F0));
        machine.memory_mut().write(0x0F0, addr);
        machine.registers_mut().set_a(value);
        for _ in 0..3 {
            machine.step().expect("step");
        }
        prop_assert_eq!(machine.memory().read(addr), value);
        prop_assert_eq!(machine.registers().a(), value);
        prop_assert_eq!(machine.device().reads(), 0);
        prop_assert!(machine.device().output().is_empty());
    }

    #[test]
    fn io_addresses_never_touch_memory(port in 0x8000u16..=0xFFFF, a in any::<u16>()) {
        let mut machine = increment_machine(b"z");
        machine.memory_mut().write(0, encode(true, Opcode::Store, 0x0F0));
        machine.memory_mut().write(1, encode(true, Opcode::Load, 0x0F0));
        machine.memory_mut().write(0x0F0, port);
        machine.registers_mut().set_a(a);
        let before = machine.memory().as_slice().to_vec();

        machine.step().expect("store step");
        machine.step().expect("load step");

        prop_assert_eq!(machine.memory().as_slice(), before.as_slice());
        prop_assert_eq!(machine.device().output(), &[a.to_le_bytes()[0]][..]);
        prop_assert_eq!(machine.registers().a(), u16::from(b'z'));
    }

    #[test]
    fn self_jump_halts_anywhere(pc in any::<u8>(), a in any::<u16>()) {
        let config = CoreConfig { entry_pc: pc, ..CoreConfig::default() };
        let mut machine = Machine::new(config, BufferDevice::default()).expect("valid config");
        machine.memory_mut().write(u16::from(pc), encode(false, Opcode::Jmp, u16::from(pc)));
        machine.registers_mut().set_a(a);
        prop_assert_eq!(machine.step().expect("halt"), StepOutcome::Halted);
        prop_assert_eq!(machine.registers().pc(), pc);
        prop_assert_eq!(machine.registers().a(), a);
    }
}
