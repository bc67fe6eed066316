//! Loader for the hex-per-line program image format.
//!
//! Each token is a hexadecimal number with an optional sign and `0x` prefix,
//! directly followed by an optional comma. Tokens are separated by whitespace.
//! Values wider than 16 bits keep their low 16 bits and a leading `-` negates
//! modulo 2^16, so `-1` loads `0xffff`. Loading is best effort: it stops at
//! end of input, at memory capacity, or at the first token that is not a
//! number, leaving the remaining words untouched.
//!
//! The whole input is read before parsing starts. Images are at most 64K
//! words, and a reader error surfaces before any word is written.

use std::io::{self, Read};

use super::Memory;

/// Why loading stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStop {
    /// The whole input was consumed.
    EndOfInput,
    /// Every memory word was filled before the input ran out.
    CapacityReached,
    /// A token that is not a hex number was found at this byte offset.
    Malformed {
        /// Byte offset of the offending token.
        offset: usize,
    },
}

/// Summary of one image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadReport {
    /// Number of words written, starting at address 0.
    pub words: usize,
    /// Reason the loader stopped.
    pub stop: LoadStop,
}

impl LoadReport {
    /// Returns true when a malformed token cut the image short.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        matches!(self.stop, LoadStop::Malformed { .. })
    }
}

/// Reads a program image into `memory` starting at address 0.
///
/// # Errors
///
/// Returns the underlying error when `reader` fails. Malformed input is not an
/// error; it is reported through [`LoadReport::stop`].
pub fn load_hex<R: Read>(mut reader: R, memory: &mut Memory) -> io::Result<LoadReport> {
    let mut text = Vec::new();
    reader.read_to_end(&mut text)?;

    let report = parse_into(&text, memory.as_mut_slice());
    match report.stop {
        LoadStop::Malformed { offset } => {
            tracing::warn!(
                words = report.words,
                offset,
                "program image truncated at malformed token"
            );
        }
        LoadStop::EndOfInput | LoadStop::CapacityReached => {
            tracing::debug!(words = report.words, stop = ?report.stop, "program image loaded");
        }
    }
    Ok(report)
}

fn parse_into(text: &[u8], words: &mut [u16]) -> LoadReport {
    let mut cursor = Cursor { text, pos: 0 };

    for (index, slot) in words.iter_mut().enumerate() {
        cursor.skip_whitespace();
        if cursor.at_end() {
            return LoadReport {
                words: index,
                stop: LoadStop::EndOfInput,
            };
        }

        let offset = cursor.pos;
        let Some(value) = cursor.hex_number() else {
            return LoadReport {
                words: index,
                stop: LoadStop::Malformed { offset },
            };
        };
        *slot = value;
        cursor.eat(b',');
    }

    LoadReport {
        words: words.len(),
        stop: LoadStop::CapacityReached,
    }
}

struct Cursor<'a> {
    text: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.text.get(self.pos + ahead).copied()
    }

    const fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek_at(0).is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: u8) {
        if self.peek_at(0) == Some(expected) {
            self.pos += 1;
        }
    }

    fn hex_number(&mut self) -> Option<u16> {
        let start = self.pos;
        let negative = match self.peek_at(0) {
            Some(b'-') => true,
            Some(b'+') => false,
            _ => return self.unsigned_hex(),
        };
        self.pos += 1;
        let Some(value) = self.unsigned_hex() else {
            self.pos = start;
            return None;
        };
        Some(if negative { value.wrapping_neg() } else { value })
    }

    fn unsigned_hex(&mut self) -> Option<u16> {
        let has_prefix = self.peek_at(0) == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x' | b'X'))
            && self.peek_at(2).is_some_and(|byte| byte.is_ascii_hexdigit());
        if has_prefix {
            self.pos += 2;
        }

        let mut value: u16 = 0;
        let mut digits = 0usize;
        while let Some(digit) = self.peek_at(0).and_then(hex_digit) {
            value = (value << 4) | digit;
            digits += 1;
            self.pos += 1;
        }
        (digits > 0).then_some(value)
    }
}

fn hex_digit(byte: u8) -> Option<u16> {
    char::from(byte)
        .to_digit(16)
        .and_then(|digit| u16::try_from(digit).ok())
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use rstest::rstest;

    use super::{load_hex, LoadReport, LoadStop};
    use crate::memory::Memory;

    fn load(text: &str, words: usize) -> (Memory, LoadReport) {
        let mut memory = Memory::new(words).expect("valid capacity");
        let report = load_hex(text.as_bytes(), &mut memory).expect("in-memory read");
        (memory, report)
    }

    #[test]
    fn malformed_token_stops_loading_after_first_word() {
        let (memory, report) = load("12,ZZ,34", 16);
        assert_eq!(report.words, 1);
        assert_eq!(report.stop, LoadStop::Malformed { offset: 3 });
        assert!(report.truncated());
        assert_eq!(memory.read(0), 0x12);
        assert!(memory.as_slice()[1..].iter().all(|word| *word == 0));
    }

    #[rstest]
    #[case("1005\n9000\n1000\n", &[0x1005, 0x9000, 0x1000])]
    #[case("1005, 9000,\t1000,", &[0x1005, 0x9000, 0x1000])]
    #[case("0x1f 0XAB", &[0x001F, 0x00AB])]
    #[case("12345", &[0x2345])]
    #[case("  \n", &[])]
    #[case("ffff", &[0xFFFF])]
    #[case("-1, +0x10 -5", &[0xFFFF, 0x0010, 0xFFFB])]
    fn tokens_load_sequentially(#[case] text: &str, #[case] expected: &[u16]) {
        let (memory, report) = load(text, 16);
        assert_eq!(report.words, expected.len());
        assert_eq!(report.stop, LoadStop::EndOfInput);
        assert_eq!(&memory.as_slice()[..expected.len()], expected);
    }

    #[test]
    fn loading_stops_at_capacity() {
        let (memory, report) = load("1 2 3 4 5 6", 4);
        assert_eq!(report.words, 4);
        assert_eq!(report.stop, LoadStop::CapacityReached);
        assert_eq!(memory.as_slice(), &[1, 2, 3, 4]);
    }

    #[rstest]
    #[case("7 - 8", 2)]
    #[case("7 +x", 2)]
    #[case("7 --1", 2)]
    fn bare_sign_is_malformed(#[case] text: &str, #[case] offset: usize) {
        let (memory, report) = load(text, 8);
        assert_eq!(report.words, 1);
        assert_eq!(report.stop, LoadStop::Malformed { offset });
        assert_eq!(memory.read(1), 0);
    }

    #[test]
    fn space_before_comma_ends_the_image() {
        let (memory, report) = load("12 , 34", 8);
        assert_eq!(report.words, 1);
        assert_eq!(report.stop, LoadStop::Malformed { offset: 3 });
        assert_eq!(memory.read(1), 0);
    }

    #[test]
    fn reader_failure_is_an_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::ErrorKind::InvalidData.into())
            }
        }

        let mut memory = Memory::new(8).expect("valid capacity");
        let error = load_hex(Broken, &mut memory).expect_err("read must fail");
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }
}
