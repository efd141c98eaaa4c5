//! Configuration errors shared by the loader and the CLI

use std::io;
use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong between a config file on disk and a
/// validated `TeeConfig`
#[derive(Debug, Error)]
pub enum ContractError {
    /// The config file could not be read
    #[error("cannot read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file extension names no known format
    #[error("unsupported config format for '{}' (expected .toml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The content is not valid for its format
    #[error("invalid {format} config: {message}")]
    ConfigSyntax {
        format: &'static str,
        message: String,
        #[source]
        source: BoxError,
    },

    /// A config could not be rendered back to text
    #[error("cannot render config as {format}: {message}")]
    ConfigRender { format: &'static str, message: String },

    /// The config parsed but describes an unusable set of outputs
    #[error("invalid output configuration at '{field}': {message}")]
    ConfigValidation { field: String, message: String },
}

impl ContractError {
    /// Wrap a deserializer error for `format`
    pub fn config_syntax<E>(format: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigSyntax {
            format,
            message: err.to_string(),
            source: Box::new(err),
        }
    }

    pub fn config_render(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::ConfigRender {
            format,
            message: err.to_string(),
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the config was readable and well-formed but rejected
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ConfigValidation { .. })
    }
}
