//! Configuration
//!
//! `fiar.yaml` declares per-environment workspace directories plus pipeline,
//! evaluation, and serving settings. Loading always validates; a bad value
//! is reported with its field name before anything touches the filesystem.

mod schema;
mod validate;

use std::fs;
use std::path::Path;

pub use schema::{
    EvaluationSettings, FiarConfig, PipelineConfig, SelectionSettings, ServeSettings,
};
pub use validate::validate_config;

use crate::error::{FiarError, Result};

/// Load and validate a `fiar.yaml` configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<FiarConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FiarError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let yaml = fs::read_to_string(path)
        .map_err(|e| FiarError::io(format!("reading {}", path.display()), e))?;
    let config: FiarConfig =
        serde_yaml::from_str(&yaml).map_err(|e| FiarError::ConfigParsing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}
