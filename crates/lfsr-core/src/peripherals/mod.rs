//! Character devices for the memory-mapped I/O window.

/// In-memory device for tests and harnesses.
pub mod buffer;
/// Device over arbitrary reader/writer streams, usually stdin/stdout.
pub mod stream;

pub use buffer::BufferDevice;
pub use stream::StreamDevice;
