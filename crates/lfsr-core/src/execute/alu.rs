//! Accumulator operations with no side effects.

use crate::api::{LeftOp, ShiftSource};

/// `a & operand`.
#[must_use]
pub const fn and(a: u16, operand: u16) -> u16 {
    a & operand
}

/// `a ^ operand`.
#[must_use]
pub const fn xor(a: u16, operand: u16) -> u16 {
    a ^ operand
}

/// Opcode 2: wrapping add in accumulate mode, otherwise shift left by one.
#[must_use]
pub const fn shift_left(a: u16, operand: u16, op: LeftOp, source: ShiftSource) -> u16 {
    match op {
        LeftOp::Accumulate => a.wrapping_add(operand),
        LeftOp::Shift => select(a, operand, source) << 1,
    }
}

/// Opcode 3: logical shift right by one.
#[must_use]
pub const fn shift_right(a: u16, operand: u16, source: ShiftSource) -> u16 {
    select(a, operand, source) >> 1
}

const fn select(a: u16, operand: u16, source: ShiftSource) -> u16 {
    match source {
        ShiftSource::Operand => operand,
        ShiftSource::Accumulator => a,
    }
}
