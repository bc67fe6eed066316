//! Word-addressed backing store and the memory-mapped I/O split.

/// Hex program image loader.
pub mod image;

pub use image::{load_hex, LoadReport, LoadStop};

use crate::ConfigError;

/// Address bit that routes `LOAD`/`STORE` to the character device.
pub const IO_ADDRESS_BIT: u16 = 0x8000;

/// Default capacity in words.
pub const DEFAULT_MEMORY_WORDS: usize = 0x1000;

/// Largest capacity a 16-bit address can reach.
pub const MAX_MEMORY_WORDS: usize = u16::MAX as usize + 1;

/// Returns true when `addr` selects the I/O device rather than memory.
#[must_use]
pub const fn is_io_address(addr: u16) -> bool {
    addr & IO_ADDRESS_BIT != 0
}

/// Checks that `words` is a usable memory capacity.
///
/// # Errors
///
/// Returns [`ConfigError`] when the capacity is zero, not a power of two, or
/// larger than [`MAX_MEMORY_WORDS`].
pub const fn validate_capacity(words: usize) -> Result<(), ConfigError> {
    if !words.is_power_of_two() {
        return Err(ConfigError::CapacityNotPowerOfTwo(words));
    }
    if words > MAX_MEMORY_WORDS {
        return Err(ConfigError::CapacityTooLarge(words));
    }
    Ok(())
}

/// Fixed-capacity array of 16-bit words.
///
/// Addresses wrap modulo the capacity; no access can fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    words: Box<[u16]>,
    mask: usize,
}

impl Memory {
    /// Allocates zeroed memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `words` is not a valid capacity.
    pub fn new(words: usize) -> Result<Self, ConfigError> {
        validate_capacity(words)?;
        Ok(Self {
            words: vec![0; words].into_boxed_slice(),
            mask: words - 1,
        })
    }

    /// Number of words.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Reads the word at `addr mod capacity`.
    #[must_use]
    pub fn read(&self, addr: u16) -> u16 {
        self.words[usize::from(addr) & self.mask]
    }

    /// Writes the word at `addr mod capacity`.
    pub fn write(&mut self, addr: u16, value: u16) {
        self.words[usize::from(addr) & self.mask] = value;
    }

    /// Full memory image in address order.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }

    /// Mutable memory image, used to pre-load programs.
    pub fn as_mut_slice(&mut self) -> &mut [u16] {
        &mut self.words
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{is_io_address, validate_capacity, Memory, DEFAULT_MEMORY_WORDS};
    use crate::ConfigError;

    #[test]
    fn default_backing_store_is_zeroed() {
        let memory = Memory::new(DEFAULT_MEMORY_WORDS).expect("valid capacity");
        assert_eq!(memory.capacity(), 0x1000);
        assert!(memory.as_slice().iter().all(|word| *word == 0));
    }

    #[test]
    fn addresses_alias_modulo_capacity() {
        let mut memory = Memory::new(0x1000).expect("valid capacity");
        memory.write(0x1003, 0xBEEF);
        assert_eq!(memory.read(0x0003), 0xBEEF);
        assert_eq!(memory.read(0x7003), 0xBEEF);
        assert_eq!(memory.read(0xF003), 0xBEEF);
    }

    #[rstest]
    #[case(0, Err(ConfigError::CapacityNotPowerOfTwo(0)))]
    #[case(3000, Err(ConfigError::CapacityNotPowerOfTwo(3000)))]
    #[case(0x2_0000, Err(ConfigError::CapacityTooLarge(0x2_0000)))]
    #[case(1, Ok(()))]
    #[case(0x2000, Ok(()))]
    #[case(0x1_0000, Ok(()))]
    fn capacity_validation(#[case] words: usize, #[case] expected: Result<(), ConfigError>) {
        assert_eq!(validate_capacity(words), expected);
    }

    #[test]
    fn io_bit_is_the_top_address_bit() {
        assert!(is_io_address(0x8000));
        assert!(is_io_address(0xFFFF));
        assert!(!is_io_address(0x7FFF));
        assert!(!is_io_address(0x0000));
    }
}
