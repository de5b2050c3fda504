//! Gradient boosting on the logistic loss
//!
//! Stagewise additive model in logit space: trees fit the (class-weighted)
//! negative gradient of the log loss, rows and columns may be subsampled
//! per stage, and `scale_pos_weight` upweights the minority positive class.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeConfig};
use super::{check_training_set, sigmoid, Classifier, ModelError, Result};

/// Boosting hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
    /// Row fraction per stage, in (0, 1].
    pub subsample: f64,
    /// Column fraction per stage, in (0, 1].
    pub colsample: f64,
    /// Gradient weight applied to positive rows.
    pub scale_pos_weight: f64,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 3,
            learning_rate: 0.1,
            subsample: 1.0,
            colsample: 1.0,
            scale_pos_weight: 2.0,
        }
    }
}

/// A fitted gradient-boosted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoost {
    init_score: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter(format!(
            "{name} must be in (0, 1], got {value}"
        )))
    }
}

impl GradientBoost {
    /// Fit a boosted model with the given hyperparameters and seed.
    pub fn fit(params: &BoostParams, x: &Array2<f64>, y: &[f64], seed: u64) -> Result<Self> {
        check_training_set(x, y)?;
        check_fraction("subsample", params.subsample)?;
        check_fraction("colsample", params.colsample)?;
        if params.learning_rate <= 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                params.learning_rate
            )));
        }

        let n = x.nrows();
        let d = x.ncols();
        let positives = y.iter().filter(|&&v| v == 1.0).count() as f64;
        let init_score = (positives / (n as f64 - positives)).ln();

        let config = TreeConfig {
            max_depth: params.max_depth,
            min_samples_split: 2,
            n_split_features: None,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scores = vec![init_score; n];
        let mut residuals = vec![0.0; n];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            for i in 0..n {
                let weight = if y[i] == 1.0 { params.scale_pos_weight } else { 1.0 };
                residuals[i] = weight * (y[i] - sigmoid(scores[i]));
            }

            let samples = sample_fraction(n, params.subsample, &mut rng);
            let pool = sample_fraction(d, params.colsample, &mut rng);
            let tree = RegressionTree::fit(x, &residuals, &samples, &pool, &config, &mut rng);

            for (score, step) in scores.iter_mut().zip(tree.predict(x)) {
                *score += params.learning_rate * step;
            }
            trees.push(tree);
        }

        Ok(Self {
            init_score,
            learning_rate: params.learning_rate,
            trees,
        })
    }

    /// Number of boosting stages.
    pub fn n_stages(&self) -> usize {
        self.trees.len()
    }
}

/// Draw `fraction` of `0..n` without replacement (at least one).
fn sample_fraction(n: usize, fraction: f64, rng: &mut StdRng) -> Vec<usize> {
    let k = ((n as f64 * fraction).floor() as usize).clamp(1, n);
    let mut indices: Vec<usize> = (0..n).collect();
    if k == n {
        return indices;
    }
    for i in 0..k {
        let j = rng.random_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}

impl Classifier for GradientBoost {
    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        let mut scores = vec![self.init_score; x.nrows()];
        for tree in &self.trees {
            for (score, step) in scores.iter_mut().zip(tree.predict(x)) {
                *score += self.learning_rate * step;
            }
        }
        scores.into_iter().map(sigmoid).collect()
    }
}
