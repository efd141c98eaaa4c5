//! Command implementations.

mod run;
mod validate;

pub use run::run_tee;
pub use validate::run_validate;
