//! TeeConfig - Config Loader output
//!
//! Declarative description of where a tee run duplicates its input.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete tee configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeeConfig {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Default append mode for file outputs without an explicit `append`
    #[serde(default)]
    pub append: bool,

    /// Keep running when interrupted (Ctrl-C)
    #[serde(default)]
    pub ignore_interrupts: bool,

    /// Read chunk size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output routes, written in order
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

impl Default for TeeConfig {
    fn default() -> Self {
        Self {
            version: ConfigVersion::V1,
            append: false,
            ignore_interrupts: false,
            buffer_size: default_buffer_size(),
            outputs: Vec::new(),
        }
    }
}

/// Default read chunk size (8 KiB, same as `std::io::copy`)
pub fn default_buffer_size() -> usize {
    8 * 1024
}

/// A single output route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output name (used for logging)
    pub name: String,

    /// Output kind
    pub kind: OutputKind,

    /// Target path, required for `file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Append instead of truncate; falls back to `TeeConfig::append`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
}

impl OutputConfig {
    /// Standard output route
    pub fn stdout() -> Self {
        Self {
            name: "stdout".to_string(),
            kind: OutputKind::Stdout,
            path: None,
            append: None,
        }
    }

    /// File route named after its path
    pub fn file(path: impl Into<PathBuf>, append: bool) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            kind: OutputKind::File,
            path: Some(path),
            append: Some(append),
        }
    }
}

/// Output kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Process standard output
    Stdout,
    /// Process standard error
    Stderr,
    /// File on disk
    File,
    /// Tracing event per chunk
    Log,
}
