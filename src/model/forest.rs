//! Random forest
//!
//! Bootstrap-aggregated probability trees: each tree is grown on a
//! bootstrap resample with a random feature subset per split, and the
//! forest's probability is the mean of the per-tree leaf means.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeConfig};
use super::{check_training_set, Classifier, Result};

/// Per-split feature subset rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFeatures {
    Sqrt,
    Log2,
}

impl MaxFeatures {
    /// Subset size for `d` features (at least 1).
    pub fn count(self, d: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (d as f64).sqrt().round() as usize,
            MaxFeatures::Log2 => (d as f64).log2().floor() as usize,
        };
        k.clamp(1, d.max(1))
    }

    /// Stable name used in search spaces.
    pub fn as_str(self) -> &'static str {
        match self {
            MaxFeatures::Sqrt => "sqrt",
            MaxFeatures::Log2 => "log2",
        }
    }
}

impl std::str::FromStr for MaxFeatures {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sqrt" => Ok(MaxFeatures::Sqrt),
            "log2" => Ok(MaxFeatures::Log2),
            other => Err(format!("unknown max_features: {other}")),
        }
    }
}

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub max_features: MaxFeatures,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 6,
            max_features: MaxFeatures::Sqrt,
        }
    }
}

/// A fitted random forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit a forest with the given hyperparameters and seed.
    pub fn fit(params: &ForestParams, x: &Array2<f64>, y: &[f64], seed: u64) -> Result<Self> {
        check_training_set(x, y)?;

        let n = x.nrows();
        let pool: Vec<usize> = (0..x.ncols()).collect();
        let config = TreeConfig {
            max_depth: params.max_depth,
            min_samples_split: 2,
            n_split_features: Some(params.max_features.count(x.ncols())),
        };
        let mut rng = StdRng::seed_from_u64(seed);

        let mut trees = Vec::with_capacity(params.n_estimators);
        for _ in 0..params.n_estimators {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            trees.push(RegressionTree::fit(x, y, &bootstrap, &pool, &config, &mut rng));
        }
        Ok(Self { trees })
    }

    /// Number of trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        let mut acc = vec![0.0; x.nrows()];
        for tree in &self.trees {
            for (sum, p) in acc.iter_mut().zip(tree.predict(x)) {
                *sum += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        acc.into_iter().map(|s| (s / n).clamp(0.0, 1.0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn separable() -> (Array2<f64>, Vec<f64>) {
        // Two clusters on one feature
        let rows: Vec<f64> = (0..40)
            .map(|i| if i < 20 { i as f64 * 0.1 } else { 10.0 + i as f64 * 0.1 })
            .collect();
        let x = Array2::from_shape_vec((40, 1), rows).expect("matrix");
        let y: Vec<f64> = (0..40).map(|i| if i < 20 { 0.0 } else { 1.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_forest_separates_clusters() {
        let (x, y) = separable();
        let params = ForestParams {
            n_estimators: 20,
            max_depth: 4,
            max_features: MaxFeatures::Sqrt,
        };
        let forest = RandomForest::fit(&params, &x, &y, 42).expect("fit");
        assert_eq!(forest.n_trees(), 20);

        let probas = forest.predict_proba(&x);
        assert!(probas[0] < 0.5, "negative cluster proba {}", probas[0]);
        assert!(probas[39] > 0.5, "positive cluster proba {}", probas[39]);
    }

    #[test]
    fn test_forest_deterministic_for_seed() {
        let (x, y) = separable();
        let params = ForestParams {
            n_estimators: 5,
            max_depth: 3,
            max_features: MaxFeatures::Log2,
        };
        let a = RandomForest::fit(&params, &x, &y, 7).expect("fit");
        let b = RandomForest::fit(&params, &x, &y, 7).expect("fit");
        assert_eq!(a.predict_proba(&x), b.predict_proba(&x));
    }

    #[test]
    fn test_forest_probabilities_bounded() {
        let (x, y) = separable();
        let forest = RandomForest::fit(&ForestParams::default(), &x, &y, 1).expect("fit");
        for p in forest.predict_proba(&x) {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_forest_single_class_rejected() {
        let x = Array2::zeros((4, 2));
        let y = vec![0.0; 4];
        assert!(RandomForest::fit(&ForestParams::default(), &x, &y, 1).is_err());
    }

    #[test]
    fn test_max_features_counts() {
        assert_eq!(MaxFeatures::Sqrt.count(16), 4);
        assert_eq!(MaxFeatures::Log2.count(16), 4);
        assert_eq!(MaxFeatures::Sqrt.count(1), 1);
        assert_eq!(MaxFeatures::Log2.count(1), 1);
    }

    #[test]
    fn test_max_features_parse() {
        assert_eq!("sqrt".parse::<MaxFeatures>(), Ok(MaxFeatures::Sqrt));
        assert_eq!("log2".parse::<MaxFeatures>(), Ok(MaxFeatures::Log2));
        assert!("auto".parse::<MaxFeatures>().is_err());
    }
}
