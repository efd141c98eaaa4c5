//! Destination implementations
//!
//! Contains WriterDestination, MemoryDestination, and LogDestination.

mod log;
mod memory;
mod writer;

pub use self::log::LogDestination;
pub use self::memory::MemoryDestination;
pub use self::writer::WriterDestination;
