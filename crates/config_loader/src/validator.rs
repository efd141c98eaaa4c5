//! Configuration validation
//!
//! Rules:
//! - output names are non-empty and unique
//! - `file` outputs carry a path
//! - buffer_size > 0

use std::collections::HashSet;

use contracts::{ContractError, OutputKind, TeeConfig};

/// Validate a TeeConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &TeeConfig) -> Result<(), ContractError> {
    validate_buffer_size(config)?;
    validate_output_names(config)?;
    validate_output_paths(config)?;
    Ok(())
}

fn validate_buffer_size(config: &TeeConfig) -> Result<(), ContractError> {
    if config.buffer_size == 0 {
        return Err(ContractError::config_validation(
            "buffer_size",
            "buffer_size must be > 0",
        ));
    }
    Ok(())
}

/// Output names must be non-empty and unique
fn validate_output_names(config: &TeeConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, output) in config.outputs.iter().enumerate() {
        if output.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("outputs[{}].name", idx),
                "output name cannot be empty",
            ));
        }
        if !seen.insert(&output.name) {
            return Err(ContractError::config_validation(
                format!("outputs[name={}]", output.name),
                "duplicate output name",
            ));
        }
    }
    Ok(())
}

fn validate_output_paths(config: &TeeConfig) -> Result<(), ContractError> {
    for output in &config.outputs {
        let has_path = output
            .path
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty());
        if output.kind == OutputKind::File && !has_path {
            return Err(ContractError::config_validation(
                format!("outputs[{}].path", output.name),
                "file output requires a path",
            ));
        }
    }
    Ok(())
}
