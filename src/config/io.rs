// src/config/io.rs
use std::fs;
use std::path::Path;

use crate::constants::CONFIG_FILE;
use crate::error::{FlowError, Result};

use super::types::FlowConfig;

/// Loads `depflow.toml` from the project root, falling back to defaults when absent.
///
/// Relative paths in the file are taken relative to `root`.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_toml_config(root: &Path) -> Result<FlowConfig> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(FlowConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(|e| FlowError::io(e, &path))?;
    let mut config =
        parse_toml(&content).map_err(|e| FlowError::Config(format!("{}: {e}", path.display())))?;
    config.rebase(root);
    Ok(config)
}

/// Parses configuration text.
///
/// # Errors
/// Returns error if the TOML is malformed or has unexpected value types.
pub fn parse_toml(content: &str) -> Result<FlowConfig> {
    toml::from_str(content).map_err(|e| FlowError::Config(e.to_string()))
}
