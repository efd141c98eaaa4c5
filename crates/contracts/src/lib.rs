//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: the
//! `Destination` capability, the declarative output configuration and the
//! configuration error type.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.

mod config;
mod destination;
mod error;

pub use config::*;
pub use destination::{addr_eq, Destination, DestinationRef};
pub use error::*;
