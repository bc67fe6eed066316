use std::io::{self, ErrorKind, Read, Stdin, Stdout, Write};

use crate::api::IoDevice;

/// Device over a byte reader and writer.
///
/// Every written character is flushed immediately so output interleaves
/// correctly with the trace on another stream.
#[derive(Debug)]
pub struct StreamDevice<R: Read, W: Write> {
    input: R,
    output: W,
}

impl StreamDevice<Stdin, Stdout> {
    /// Device on the process standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R: Read, W: Write> StreamDevice<R, W> {
    /// Wraps a reader and writer.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns the wrapped reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: Read, W: Write> IoDevice for StreamDevice<R, W> {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(error) if error.kind() == ErrorKind::Interrupted => {}
                Err(error) => return Err(error),
            }
        }
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.output.write_all(&[byte])?;
        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::StreamDevice;
    use crate::api::IoDevice;

    struct Unwritable;

    impl Write for Unwritable {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn reads_bytes_then_end_of_stream() {
        let mut device = StreamDevice::new(&b"ok"[..], Vec::new());
        assert_eq!(device.read_char().expect("slice read"), Some(b'o'));
        assert_eq!(device.read_char().expect("slice read"), Some(b'k'));
        assert_eq!(device.read_char().expect("slice read"), None);
    }

    #[test]
    fn writes_pass_through() {
        let mut device = StreamDevice::new(io::empty(), Vec::new());
        device.write_char(b'A').expect("vec write");
        device.write_char(b'\n').expect("vec write");
        let (_, output) = device.into_parts();
        assert_eq!(output, b"A\n");
    }

    #[test]
    fn writer_failure_surfaces() {
        let mut device = StreamDevice::new(io::empty(), Unwritable);
        let error = device.write_char(b'A').expect_err("write must fail");
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }
}
