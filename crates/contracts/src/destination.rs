//! Destination trait - fan-out output interface
//!
//! Defines the single capability a fan-out sink duplicates writes to.

use std::io;
use std::sync::Arc;

/// Write-capable endpoint
///
/// Mirrors the contract of [`std::io::Write::write`]: write some prefix of
/// `buf` and report how many bytes were accepted. Returning fewer bytes than
/// `buf.len()` without an error is a short write.
///
/// Takes `&self` because the same handle may be written to from several
/// threads at once; implementations synchronise internally.
pub trait Destination: Send + Sync {
    /// Write `buf`, returning the number of bytes accepted
    ///
    /// # Errors
    /// Any I/O failure of the underlying endpoint.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;
}

/// Shared destination handle
///
/// Two handles are the same destination only if they point to the same
/// allocation; see [`addr_eq`].
pub type DestinationRef = Arc<dyn Destination>;

/// Identity comparison of two destination handles
///
/// Compares allocation addresses only. Vtable pointers are ignored so a
/// handle stays identical to itself after being coerced to `dyn Destination`.
pub fn addr_eq<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl<D: Destination + ?Sized> Destination for Arc<D> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }
}

impl<D: Destination + ?Sized> Destination for Box<D> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }
}
