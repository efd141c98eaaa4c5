//! Text formats a `TeeConfig` can be read from and written to

use std::fmt;
use std::path::Path;

use contracts::{ContractError, TeeConfig};

/// Configuration file format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Infer format from a bare extension (case-insensitive, no dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Infer format from a config file path
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ContractError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }

    /// Human-readable format name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// Deserialize `content` into a config (no validation)
    pub fn parse(self, content: &str) -> Result<TeeConfig, ContractError> {
        match self {
            Self::Toml => {
                toml::from_str(content).map_err(|e| ContractError::config_syntax(self.name(), e))
            }
            Self::Json => serde_json::from_str(content)
                .map_err(|e| ContractError::config_syntax(self.name(), e)),
        }
    }

    /// Serialize `config` in this format
    pub fn render(self, config: &TeeConfig) -> Result<String, ContractError> {
        match self {
            Self::Toml => toml::to_string_pretty(config)
                .map_err(|e| ContractError::config_render(self.name(), e)),
            Self::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ContractError::config_render(self.name(), e)),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
