//! Fanout error types

use std::io;

use thiserror::Error;

/// Fanout-specific errors
#[derive(Debug, Error)]
pub enum FanoutError {
    /// A destination returned an error; dispatch stopped there
    #[error("destination {index} write error: {source}")]
    Destination {
        index: usize,
        #[source]
        source: io::Error,
    },

    /// A destination accepted fewer bytes than given without an error
    #[error("short write to destination {index}: wrote {written} of {expected} bytes")]
    ShortWrite {
        index: usize,
        written: usize,
        expected: usize,
    },

    /// Destination creation error
    #[error("failed to create destination '{name}': {message}")]
    DestinationCreation { name: String, message: String },
}

impl FanoutError {
    /// Create a destination creation error
    pub fn destination_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// True for the synthesized short-write error
    pub fn is_short_write(&self) -> bool {
        matches!(self, Self::ShortWrite { .. })
    }

    /// Position of the destination that stopped the write, if any
    pub fn destination_index(&self) -> Option<usize> {
        match self {
            Self::Destination { index, .. } | Self::ShortWrite { index, .. } => Some(*index),
            Self::DestinationCreation { .. } => None,
        }
    }
}

/// Destination errors convert back to the destination's own `io::Error`,
/// untouched. Short writes become `ErrorKind::WriteZero`, the kind
/// `std::io::Write::write_all` uses for the same condition.
impl From<FanoutError> for io::Error {
    fn from(err: FanoutError) -> Self {
        match err {
            FanoutError::Destination { source, .. } => source,
            short @ FanoutError::ShortWrite { .. } => {
                io::Error::new(io::ErrorKind::WriteZero, short)
            }
            other @ FanoutError::DestinationCreation { .. } => io::Error::other(other),
        }
    }
}
