//! Stratified train/val/test split
//!
//! The labeled dataset is split 70/15/15: a stratified holdout takes 30%
//! of the rows, then that holdout is halved (again stratified) into
//! validation and test. Shuffling is a seeded LCG so splits are
//! reproducible across runs.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Frame, StandardScaler};
use crate::error::Result as CrateResult;
use crate::io::{load_json, save_json};

/// One split part in row-major serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPart {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<u8>,
}

impl SplitPart {
    fn from_rows(matrix: &Array2<f64>, y: &[u8], indices: &[usize]) -> Self {
        let x = indices
            .iter()
            .map(|&i| matrix.row(i).to_vec())
            .collect();
        let y = indices.iter().map(|&i| y[i]).collect();
        Self { x, y }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the part is empty.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Dense feature matrix.
    pub fn to_matrix(&self) -> Array2<f64> {
        let cols = self.x.first().map_or(0, Vec::len);
        let flat: Vec<f64> = self.x.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.x.len(), cols), flat)
            .expect("split rows are rectangular")
    }

    /// Labels as f64 targets.
    pub fn labels_f64(&self) -> Vec<f64> {
        self.y.iter().map(|&v| f64::from(v)).collect()
    }

    /// Count of positive labels.
    pub fn positives(&self) -> usize {
        self.y.iter().filter(|&&v| v == 1).count()
    }
}

/// Scaled splits plus the fitted scaler, persisted between pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitBundle {
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub train: SplitPart,
    pub val: SplitPart,
    pub test: SplitPart,
}

impl SplitBundle {
    /// Scale the features and split 70/15/15 stratified by label.
    pub fn build(features: &Frame, y: &[u8], holdout: f64, seed: u64) -> super::Result<Self> {
        let (scaler, scaled) = StandardScaler::fit_transform(features)?;

        let (train_idx, holdout_idx) = stratified_split(y, holdout, seed);
        let holdout_labels: Vec<u8> = holdout_idx.iter().map(|&i| y[i]).collect();
        let (val_rel, test_rel) = stratified_split(&holdout_labels, 0.5, seed);
        let val_idx: Vec<usize> = val_rel.iter().map(|&i| holdout_idx[i]).collect();
        let test_idx: Vec<usize> = test_rel.iter().map(|&i| holdout_idx[i]).collect();

        Ok(Self {
            feature_names: features.columns().to_vec(),
            train: SplitPart::from_rows(&scaled, y, &train_idx),
            val: SplitPart::from_rows(&scaled, y, &val_idx),
            test: SplitPart::from_rows(&scaled, y, &test_idx),
            scaler,
        })
    }

    /// Persist the bundle as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> CrateResult<()> {
        save_json(path, self)
    }

    /// Load a bundle written by [`SplitBundle::save`].
    pub fn load(path: impl AsRef<Path>) -> CrateResult<Self> {
        load_json(path)
    }
}

/// Stratified two-way split: returns (kept, held) index sets.
///
/// Each class's indices are shuffled with a seeded LCG, then `holdout`
/// of them (rounded) go to the held set. Deterministic for a fixed seed.
pub fn stratified_split(y: &[u8], holdout: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut kept = Vec::new();
    let mut held = Vec::new();

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();
        lcg_shuffle(&mut indices, seed ^ u64::from(class));

        let n_held = (indices.len() as f64 * holdout).round() as usize;
        let n_held = n_held.min(indices.len());
        held.extend_from_slice(&indices[..n_held]);
        kept.extend_from_slice(&indices[n_held..]);
    }

    kept.sort_unstable();
    held.sort_unstable();
    (kept, held)
}

fn lcg_shuffle(indices: &mut [usize], seed: u64) {
    let mut state = seed;
    for i in (1..indices.len()).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let j = (state >> 33) as usize % (i + 1);
        indices.swap(i, j);
    }
}
