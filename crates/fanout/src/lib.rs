//! # Fanout
//!
//! Dynamic tee writer.
//!
//! Responsibilities:
//! - Duplicate every write to an ordered set of destinations
//! - Add/remove destinations while other threads are writing
//! - Stop at the first failing destination and report it

pub mod destinations;
pub mod error;
pub mod fanout;
pub mod metrics;

pub use contracts::{Destination, DestinationRef};
pub use destinations::{LogDestination, MemoryDestination, WriterDestination};
pub use error::FanoutError;
pub use fanout::{create_sink, FanoutSink};
pub use metrics::{FanoutMetrics, MetricsSnapshot};
