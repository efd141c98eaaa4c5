//! MemoryDestination - records every chunk in memory

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::Destination;

/// In-memory destination keeping each received chunk separately
#[derive(Debug, Default)]
pub struct MemoryDestination {
    chunks: Mutex<Vec<Vec<u8>>>,
}

impl MemoryDestination {
    /// Create an empty MemoryDestination
    pub fn new() -> Self {
        Self::default()
    }

    /// Every chunk received, in arrival order
    pub fn chunks(&self) -> Vec<Vec<u8>> {
        self.lock().clone()
    }

    /// Most recent chunk
    pub fn last_chunk(&self) -> Option<Vec<u8>> {
        self.lock().last().cloned()
    }

    /// All chunks concatenated
    pub fn contents(&self) -> Vec<u8> {
        self.lock().concat()
    }

    /// Drop everything recorded so far
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.chunks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Destination for MemoryDestination {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.lock().push(buf.to_vec());
        Ok(buf.len())
    }
}
