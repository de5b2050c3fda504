//! Feature standardization
//!
//! Per-column mean/variance scaling fitted on the training frame and
//! persisted alongside the model so the scoring endpoint applies the same
//! transform. The scaler remembers feature names; named records are
//! validated against them before scoring.

use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{DataError, Frame, Result};

/// Per-column standardizer (subtract mean, divide by population std).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fit a scaler on the feature frame.
    pub fn fit(frame: &Frame) -> Self {
        let matrix = frame.to_matrix();
        let n = matrix.nrows().max(1) as f64;
        let mut mean = Vec::with_capacity(matrix.ncols());
        let mut std = Vec::with_capacity(matrix.ncols());

        for col in matrix.columns() {
            let m = col.sum() / n;
            let var = col.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
            mean.push(m);
            std.push(var.sqrt());
        }

        Self {
            feature_names: frame.columns().to_vec(),
            mean,
            std,
        }
    }

    /// Names of the features this scaler was fitted on, in order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of features.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Standardize a matrix with the fitted statistics.
    ///
    /// Columns with zero variance map to zeros.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(DataError::ShapeMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        let mut out = x.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (m, s) = (self.mean[j], self.std[j]);
            for v in col.iter_mut() {
                *v = if s > 0.0 { (*v - m) / s } else { 0.0 };
            }
        }
        Ok(out)
    }

    /// Fit on a frame and return the standardized matrix with the scaler.
    pub fn fit_transform(frame: &Frame) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(frame);
        let scaled = scaler.transform(&frame.to_matrix())?;
        Ok((scaler, scaled))
    }

    /// Standardize one named record (scoring input).
    ///
    /// The record must carry exactly the fitted feature set: an unknown or
    /// missing feature name is an error before any model is touched.
    pub fn transform_named(&self, record: &HashMap<String, f64>) -> Result<Vec<f64>> {
        for key in record.keys() {
            if !self.feature_names.contains(key) {
                return Err(DataError::UnknownFeature(key.clone()));
            }
        }
        let mut out = Vec::with_capacity(self.n_features());
        for (j, name) in self.feature_names.iter().enumerate() {
            let value = *record
                .get(name)
                .ok_or_else(|| DataError::MissingFeature(name.clone()))?;
            let (m, s) = (self.mean[j], self.std[j]);
            out.push(if s > 0.0 { (value - m) / s } else { 0.0 });
        }
        Ok(out)
    }
}
