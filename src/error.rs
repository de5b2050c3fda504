//! Crate-level error types with actionable diagnostics.
//!
//! Configuration and artifact I/O errors carry enough context to resolve
//! the problem without consulting external documentation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for crate-level operations.
pub type Result<T> = std::result::Result<T, FiarError>;

/// Errors surfaced by configuration loading and artifact I/O.
#[derive(Error, Debug)]
pub enum FiarError {
    /// Configuration file not found at the expected path.
    #[error("Configuration file not found: {path}\n  → Create fiar.yaml or pass --config with a different path")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// Configuration value is invalid.
    #[error("Invalid configuration value for '{field}': {message}\n  → {suggestion}")]
    ConfigValue {
        field: String,
        message: String,
        suggestion: String,
    },

    /// No workspace directory is configured for the requested environment.
    #[error("No workspace configured for environment '{env}'\n  → Add a 'workspaces.{env}' entry to fiar.yaml")]
    WorkspaceNotConfigured { env: String },

    /// Artifact file not found.
    #[error("Artifact not found: {path}\n  → Run the producing pipeline stage first or check the path")]
    ArtifactNotFound { path: PathBuf },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl FiarError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for FiarError {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}
