//! Shared application state

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ndarray::Array2;

use super::{Result, ServeConfig};
use crate::data::{DataError, StandardScaler};
use crate::io::Bundle;
use crate::model::Classifier;
use crate::registry::{ModelRecord, ModelRegistry};

struct StateInner {
    bundle: Bundle,
    record: ModelRecord,
    threshold: f64,
    started: Instant,
    scored_rows: AtomicU64,
}

/// Cloneable handle to the loaded model and counters.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<StateInner>,
}

impl AppState {
    /// Resolve the configured model version from a registry and load its
    /// bundle.
    pub fn from_registry(registry: &ModelRegistry, config: &ServeConfig) -> Result<Self> {
        let version = match &config.version {
            Some(v) => v.clone(),
            None => registry.latest_version(&config.model_name)?,
        };
        let record = registry.get(&config.model_name, &version)?;
        let bundle = Bundle::load(registry.bundle_dir(&config.model_name, &version))?;
        let threshold = config.threshold_override.unwrap_or(bundle.deploy.threshold);

        Ok(Self {
            inner: Arc::new(StateInner {
                bundle,
                record,
                threshold,
                started: Instant::now(),
                scored_rows: AtomicU64::new(0),
            }),
        })
    }

    /// Build a state directly from a bundle (tests).
    pub fn from_bundle(bundle: Bundle, record: ModelRecord, threshold: f64) -> Self {
        Self {
            inner: Arc::new(StateInner {
                bundle,
                record,
                threshold,
                started: Instant::now(),
                scored_rows: AtomicU64::new(0),
            }),
        }
    }

    /// The registry record backing this deployment.
    pub fn record(&self) -> &ModelRecord {
        &self.inner.record
    }

    /// Family name of the deployed model.
    pub fn family(&self) -> &str {
        &self.inner.bundle.deploy.family
    }

    /// Decision threshold in effect.
    pub fn threshold(&self) -> f64 {
        self.inner.threshold
    }

    /// Seconds since the server loaded the model.
    pub fn uptime_secs(&self) -> u64 {
        self.inner.started.elapsed().as_secs()
    }

    /// Total rows scored since startup.
    pub fn scored_rows(&self) -> u64 {
        self.inner.scored_rows.load(Ordering::Relaxed)
    }

    /// Feature schema the scaler was fitted on.
    pub fn feature_names(&self) -> &[String] {
        self.inner.bundle.scaler.feature_names()
    }

    /// Validate, scale, and score named records.
    ///
    /// Returns per-row probabilities and thresholded predictions. Schema
    /// violations surface before the model runs.
    pub fn score_records(
        &self,
        records: &[HashMap<String, f64>],
    ) -> std::result::Result<(Vec<f64>, Vec<u8>), DataError> {
        let scaler: &StandardScaler = &self.inner.bundle.scaler;
        let n_features = scaler.n_features();
        let mut flat = Vec::with_capacity(records.len() * n_features);
        for record in records {
            flat.extend(scaler.transform_named(record)?);
        }
        let x = Array2::from_shape_vec((records.len(), n_features), flat)
            .expect("scaled rows are rectangular");

        let probas = self.inner.bundle.model.predict_proba(&x);
        let preds = self.inner.bundle.model.predict(&x, self.inner.threshold);
        self.inner
            .scored_rows
            .fetch_add(records.len() as u64, Ordering::Relaxed);
        Ok((probas, preds))
    }
}
