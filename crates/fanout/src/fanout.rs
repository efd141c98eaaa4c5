//! FanoutSink - duplicates writes to a dynamic set of destinations

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, instrument, trace};

use contracts::{addr_eq, Destination, DestinationRef, OutputConfig, OutputKind};

use crate::destinations::{LogDestination, WriterDestination};
use crate::error::FanoutError;
use crate::metrics::FanoutMetrics;

/// Writer that duplicates its writes to every destination, like `tee(1)`
///
/// Destinations are written one at a time, in the order they were added.
/// The first destination that fails stops the write; later destinations do
/// not see the buffer and earlier ones keep it.
///
/// Writes share a read lock, so any number of threads may write at once.
/// [`add`](Self::add), [`remove`](Self::remove) and [`clear`](Self::clear)
/// take the write lock and wait for in-flight writes to finish.
///
/// A sink must not be added to itself, directly or through a nested sink.
pub struct FanoutSink {
    destinations: RwLock<Vec<DestinationRef>>,
    metrics: FanoutMetrics,
}

impl FanoutSink {
    /// Create a sink writing to `destinations`, in the given order
    pub fn new(destinations: Vec<DestinationRef>) -> Self {
        Self {
            destinations: RwLock::new(destinations),
            metrics: FanoutMetrics::new(),
        }
    }

    /// Write `buf` to every destination
    ///
    /// Returns `buf.len()` once every destination accepted the whole buffer.
    /// A sink without destinations accepts everything.
    ///
    /// # Errors
    /// - [`FanoutError::Destination`] with the destination's own error
    /// - [`FanoutError::ShortWrite`] if a destination accepted only part of `buf`
    #[instrument(name = "fanout_write", level = "trace", skip_all, fields(len = buf.len()))]
    pub fn write(&self, buf: &[u8]) -> Result<usize, FanoutError> {
        let destinations = self.read_destinations();

        for (index, destination) in destinations.iter().enumerate() {
            let written = match destination.write(buf) {
                Ok(written) => written,
                Err(source) => {
                    self.metrics.inc_failure_count();
                    debug!(index, error = %source, "Destination write failed");
                    return Err(FanoutError::Destination { index, source });
                }
            };

            if written < buf.len() {
                self.metrics.inc_short_write_count();
                debug!(index, written, expected = buf.len(), "Short write");
                return Err(FanoutError::ShortWrite {
                    index,
                    written,
                    expected: buf.len(),
                });
            }
        }

        trace!(destinations = destinations.len(), "Write delivered");
        self.metrics.record_write(buf.len());
        Ok(buf.len())
    }

    /// Append a destination
    ///
    /// Writes that start after this returns include it.
    pub fn add(&self, destination: DestinationRef) {
        let mut destinations = self.write_destinations();
        destinations.push(destination);
        debug!(destinations = destinations.len(), "Destination added");
    }

    /// Remove every occurrence of `destination`
    ///
    /// Handles are compared by identity, not value. Removing a destination
    /// that is not present does nothing.
    pub fn remove<D: ?Sized>(&self, destination: &Arc<D>) {
        let mut destinations = self.write_destinations();
        let before = destinations.len();
        destinations.retain(|existing| !addr_eq(existing, destination));
        debug!(
            removed = before - destinations.len(),
            destinations = destinations.len(),
            "Destination removed"
        );
    }

    /// Remove all destinations
    pub fn clear(&self) {
        self.write_destinations().clear();
        debug!("Destinations cleared");
    }

    /// Whether `destination` is currently attached (by identity)
    pub fn contains<D: ?Sized>(&self, destination: &Arc<D>) -> bool {
        self.read_destinations()
            .iter()
            .any(|existing| addr_eq(existing, destination))
    }

    /// Snapshot of the current destinations, in write order
    pub fn destinations(&self) -> Vec<DestinationRef> {
        self.read_destinations().clone()
    }

    /// Number of attached destinations (duplicates counted)
    pub fn len(&self) -> usize {
        self.read_destinations().len()
    }

    /// True when no destination is attached
    pub fn is_empty(&self) -> bool {
        self.read_destinations().is_empty()
    }

    /// Get dispatch metrics
    pub fn metrics(&self) -> &FanoutMetrics {
        &self.metrics
    }

    // push/retain/clear never leave the Vec half-updated, so a poisoned lock
    // still guards a valid sequence.
    fn read_destinations(&self) -> RwLockReadGuard<'_, Vec<DestinationRef>> {
        self.destinations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_destinations(&self) -> RwLockWriteGuard<'_, Vec<DestinationRef>> {
        self.destinations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FanoutSink {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FromIterator<DestinationRef> for FanoutSink {
    fn from_iter<I: IntoIterator<Item = DestinationRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl std::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("destinations", &self.len())
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

/// Sinks nest: a sink is itself a destination
impl Destination for FanoutSink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        FanoutSink::write(self, buf).map_err(io::Error::from)
    }
}

/// `flush` is a no-op: destinations expose no flush and the sink buffers nothing
impl io::Write for &FanoutSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FanoutSink::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for FanoutSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FanoutSink::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Create a destination from configuration
#[instrument(
    name = "fanout_create_destination",
    skip(config),
    fields(output = %config.name, kind = ?config.kind)
)]
fn create_destination(
    config: &OutputConfig,
    default_append: bool,
) -> Result<DestinationRef, FanoutError> {
    match config.kind {
        OutputKind::Stdout => Ok(Arc::new(WriterDestination::new(&config.name, io::stdout()))),
        OutputKind::Stderr => Ok(Arc::new(WriterDestination::new(&config.name, io::stderr()))),
        OutputKind::Log => Ok(Arc::new(LogDestination::new(&config.name))),
        OutputKind::File => {
            let path = config.path.as_ref().ok_or_else(|| {
                FanoutError::destination_creation(&config.name, "file output requires a path")
            })?;
            let append = config.append.unwrap_or(default_append);
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .append(append)
                .truncate(!append)
                .open(path)
                .map_err(|e| FanoutError::destination_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(WriterDestination::new(&config.name, file)))
        }
    }
}

/// Convenience function to create a sink from output configs
///
/// File outputs without an explicit `append` use `default_append`.
#[instrument(name = "fanout_create_sink", skip(outputs), fields(outputs = outputs.len()))]
pub fn create_sink(
    outputs: &[OutputConfig],
    default_append: bool,
) -> Result<FanoutSink, FanoutError> {
    let destinations = outputs
        .iter()
        .map(|output| create_destination(output, default_append))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FanoutSink::new(destinations))
}
