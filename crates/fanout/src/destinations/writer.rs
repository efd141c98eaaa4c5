//! WriterDestination - adapts any `std::io::Write` into a destination

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::Destination;
use tracing::{instrument, trace};

/// Destination backed by a standard writer (file, stdout, socket, ...)
///
/// The writer sits behind a mutex so concurrent fanout writes reach it one
/// at a time. A chunk is pushed through repeated `Write::write` calls until
/// the writer has taken all of it; only a writer that stops accepting bytes
/// (`Ok(0)`) reports fewer bytes than the chunk.
pub struct WriterDestination<W> {
    name: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterDestination<W> {
    /// Create a new WriterDestination
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Destination name (used for logging)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flush the underlying writer
    #[instrument(name = "writer_destination_flush", skip(self), fields(destination = %self.name))]
    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    /// Consume the destination, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Destination for WriterDestination<W> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut writer = self.lock();
        let mut written = 0;

        while written < buf.len() {
            match writer.write(&buf[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        trace!(destination = %self.name, written, "Chunk written");
        Ok(written)
    }
}
