//! LogDestination - logs chunk summaries via tracing

use std::io;

use contracts::Destination;
use tracing::info;

/// Destination that logs each chunk for debugging
pub struct LogDestination {
    name: String,
}

impl LogDestination {
    /// Create a new LogDestination with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Destination name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Destination for LogDestination {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        info!(
            destination = %self.name,
            len = buf.len(),
            preview = %String::from_utf8_lossy(&buf[..buf.len().min(64)]),
            "Chunk received"
        );
        Ok(buf.len())
    }
}
