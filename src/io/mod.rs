//! Artifact I/O
//!
//! JSON persistence helpers plus the model bundle layout shared by the
//! pipeline, registry, and scoring service. A bundle directory holds
//! `model.json`, `scaler.json`, and `deploy.json`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::StandardScaler;
use crate::error::{FiarError, Result};
use crate::model::FittedModel;

/// Write a value as pretty JSON, creating parent directories.
pub fn save_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| FiarError::io(format!("creating {}", parent.display()), e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| FiarError::io(format!("writing {}", path.display()), e))
}

/// Load a JSON value written by [`save_json`].
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FiarError::ArtifactNotFound {
            path: path.to_path_buf(),
        });
    }
    let json = fs::read_to_string(path)
        .map_err(|e| FiarError::io(format!("reading {}", path.display()), e))?;
    Ok(serde_json::from_str(&json)?)
}

/// Deployment metadata persisted alongside the fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploySpec {
    pub model_name: String,
    pub family: String,
    /// Cross-validated selection score of the winning configuration.
    pub cv_score: f64,
    /// Decision threshold applied at scoring time.
    pub threshold: f64,
    pub beta: f64,
    pub trained_at: DateTime<Utc>,
}

/// A complete scoring artifact: model, scaler, deployment metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub model: FittedModel,
    pub scaler: StandardScaler,
    pub deploy: DeploySpec,
}

impl Bundle {
    pub const MODEL_FILE: &'static str = "model.json";
    pub const SCALER_FILE: &'static str = "scaler.json";
    pub const DEPLOY_FILE: &'static str = "deploy.json";

    /// Write the bundle's three files into `dir`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        save_json(dir.join(Self::MODEL_FILE), &self.model)?;
        save_json(dir.join(Self::SCALER_FILE), &self.scaler)?;
        save_json(dir.join(Self::DEPLOY_FILE), &self.deploy)?;
        Ok(())
    }

    /// Load a bundle from a directory written by [`Bundle::save`].
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            model: load_json(dir.join(Self::MODEL_FILE))?,
            scaler: load_json(dir.join(Self::SCALER_FILE))?,
            deploy: load_json(dir.join(Self::DEPLOY_FILE))?,
        })
    }

    /// The three file paths a bundle occupies under `dir`.
    pub fn files(dir: impl AsRef<Path>) -> [PathBuf; 3] {
        let dir = dir.as_ref();
        [
            dir.join(Self::MODEL_FILE),
            dir.join(Self::SCALER_FILE),
            dir.join(Self::DEPLOY_FILE),
        ]
    }
}
