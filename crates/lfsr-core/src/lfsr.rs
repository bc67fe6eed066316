//! Program-counter sequencer.
//!
//! The machine has no incrementing program counter. The next fetch address is
//! produced by an 8-bit Galois LFSR, which needs no carry chain in hardware.
//! A plain `+1` counter is kept as an alternative mode for bring-up.

/// Mask applied to every program-counter update.
pub const PC_MASK: u16 = 0x00FF;

/// Default tap mask. Every non-zero state lies on one cycle of length 255.
pub const DEFAULT_POLYNOMIAL: u8 = 0xB8;

/// How the program counter advances after a non-jump instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PcMode {
    /// Galois LFSR step using the configured polynomial mask.
    #[default]
    Lfsr,
    /// Conventional `(pc + 1) mod 256` counter.
    Increment,
}

/// Computes the program counter that follows `n`.
///
/// In [`PcMode::Lfsr`] the low bit is shifted out and, when it was set, the
/// shifted value is xored with `polynomial_mask`. Zero is a fixed point of
/// the LFSR for any mask.
#[must_use]
pub const fn next_pc(n: u8, polynomial_mask: u8, mode: PcMode) -> u8 {
    match mode {
        PcMode::Increment => n.wrapping_add(1),
        PcMode::Lfsr => {
            let feedback = n & 1;
            let shifted = n >> 1;
            if feedback == 1 {
                shifted ^ polynomial_mask
            } else {
                shifted
            }
        }
    }
}

/// Iterator over the program-counter values visited from a seed.
///
/// The seed itself is yielded first. The iterator never ends; callers bound
/// it with `take`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    state: u8,
    polynomial_mask: u8,
    mode: PcMode,
}

impl Sequence {
    /// Starts a sequence at `seed`.
    #[must_use]
    pub const fn new(seed: u8, polynomial_mask: u8, mode: PcMode) -> Self {
        Self {
            state: seed,
            polynomial_mask,
            mode,
        }
    }
}

impl Iterator for Sequence {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.state;
        self.state = next_pc(current, self.polynomial_mask, self.mode);
        Some(current)
    }
}

/// Number of steps until `seed` is reached again.
///
/// Returns `None` when the seed sits on a tail that never returns to it.
/// The state space has 256 values, so the search is bounded.
#[must_use]
pub fn cycle_length(seed: u8, polynomial_mask: u8, mode: PcMode) -> Option<usize> {
    Sequence::new(seed, polynomial_mask, mode)
        .skip(1)
        .take(256)
        .position(|state| state == seed)
        .map(|index| index + 1)
}
