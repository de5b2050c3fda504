//! Workspace registries
//!
//! Versioned, file-backed resources under a per-environment workspace
//! directory:
//!
//! - `assets`: content-hash-deduplicated data assets
//! - `models`: model bundle versions with a JSON index
//! - `staging`: environment stages and cross-workspace promotion

mod assets;
mod models;
mod staging;

use std::path::PathBuf;

use thiserror::Error;

pub use assets::{sha256_file, AssetRecord, AssetStore, RegisterOutcome};
pub use models::{ModelRecord, ModelRegistry};
pub use staging::{promote, Stage};

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("I/O error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model not found: {name} v{version}")]
    ModelNotFound { name: String, version: String },

    #[error("no registered versions found for model: {name}")]
    NoVersions { name: String },

    #[error("model already exists: {name} v{version}")]
    AlreadyExists { name: String, version: String },

    #[error("invalid promotion from {from} to {to} for {name} v{version}")]
    InvalidTransition {
        name: String,
        version: String,
        from: Stage,
        to: Stage,
    },

    #[error("bundle directory not found: {path}")]
    MissingBundle { path: PathBuf },

    #[error("asset file not found: {path}")]
    MissingAsset { path: PathBuf },
}

impl RegistryError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
