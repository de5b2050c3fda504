//! Depth-limited regression tree
//!
//! Shared weak learner for both ensembles: splits minimize the summed
//! squared error of the children, leaves predict the mean target. A split
//! may be restricted to a random feature subset (forest-style) and to a
//! caller-provided feature pool (boosting column subsampling).

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tree-growing knobs.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Maximum depth; 0 means a single leaf.
    pub max_depth: usize,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
    /// Random feature subset size per split (None = use the whole pool).
    pub n_split_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_samples_split: 2,
            n_split_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    root: Node,
}

struct Grower<'a> {
    x: &'a Array2<f64>,
    targets: &'a [f64],
    feature_pool: &'a [usize],
    config: &'a TreeConfig,
}

impl RegressionTree {
    /// Fit a tree on `targets` over the given sample rows.
    ///
    /// `feature_pool` limits which columns splits may use; the per-split
    /// random subset (if configured) is drawn from that pool with `rng`.
    pub fn fit(
        x: &Array2<f64>,
        targets: &[f64],
        samples: &[usize],
        feature_pool: &[usize],
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> Self {
        let grower = Grower {
            x,
            targets,
            feature_pool,
            config,
        };
        let root = grower.grow(samples, 0, rng);
        Self { root }
    }

    /// Predict one row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Predict every row of a matrix.
    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows().into_iter().map(|r| self.predict_row(r)).collect()
    }

    /// Number of leaves (diagnostic).
    pub fn n_leaves(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl Grower<'_> {
    fn grow(&self, samples: &[usize], depth: usize, rng: &mut StdRng) -> Node {
        let mean = self.mean(samples);
        if depth >= self.config.max_depth
            || samples.len() < self.config.min_samples_split
        {
            return Node::Leaf { value: mean };
        }

        let candidates = self.candidate_features(rng);
        match self.best_split(samples, &candidates) {
            None => Node::Leaf { value: mean },
            Some(split) => {
                let (left, right): (Vec<usize>, Vec<usize>) = samples
                    .iter()
                    .copied()
                    .partition(|&i| self.x[[i, split.feature]] <= split.threshold);
                if left.is_empty() || right.is_empty() {
                    return Node::Leaf { value: mean };
                }
                Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(self.grow(&left, depth + 1, rng)),
                    right: Box::new(self.grow(&right, depth + 1, rng)),
                }
            }
        }
    }

    fn mean(&self, samples: &[usize]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().map(|&i| self.targets[i]).sum::<f64>() / samples.len() as f64
    }

    /// Draw the per-split feature subset from the pool.
    fn candidate_features(&self, rng: &mut StdRng) -> Vec<usize> {
        match self.config.n_split_features {
            Some(k) if k < self.feature_pool.len() => {
                let mut pool = self.feature_pool.to_vec();
                for i in 0..k {
                    let j = rng.random_range(i..pool.len());
                    pool.swap(i, j);
                }
                pool.truncate(k);
                pool
            }
            _ => self.feature_pool.to_vec(),
        }
    }

    fn best_split(&self, samples: &[usize], features: &[usize]) -> Option<BestSplit> {
        let n = samples.len() as f64;
        let total_sum: f64 = samples.iter().map(|&i| self.targets[i]).sum();
        let total_sq: f64 = samples.iter().map(|&i| self.targets[i].powi(2)).sum();
        let parent_sse = total_sq - total_sum * total_sum / n;
        if parent_sse <= 1e-12 {
            return None;
        }

        let mut best: Option<BestSplit> = None;
        let mut sorted = samples.to_vec();

        for &feature in features {
            sorted.sort_by(|&a, &b| {
                self.x[[a, feature]]
                    .partial_cmp(&self.x[[b, feature]])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 0..sorted.len() - 1 {
                let t = self.targets[sorted[k]];
                left_sum += t;
                left_sq += t * t;

                let here = self.x[[sorted[k], feature]];
                let next = self.x[[sorted[k + 1], feature]];
                if next <= here {
                    continue;
                }

                let nl = (k + 1) as f64;
                let nr = n - nl;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / nl)
                    + (right_sq - right_sum * right_sum / nr);

                let improves = match &best {
                    Some(b) => sse < b.sse,
                    None => sse < parent_sse - 1e-12,
                };
                if improves {
                    best = Some(BestSplit {
                        feature,
                        threshold: (here + next) / 2.0,
                        sse,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn fit_all(x: &Array2<f64>, targets: &[f64], config: &TreeConfig) -> RegressionTree {
        let samples: Vec<usize> = (0..x.nrows()).collect();
        let pool: Vec<usize> = (0..x.ncols()).collect();
        RegressionTree::fit(x, targets, &samples, &pool, config, &mut rng())
    }

    #[test]
    fn test_single_leaf_at_depth_zero() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let targets = [0.0, 0.0, 1.0, 1.0];
        let tree = fit_all(
            &x,
            &targets,
            &TreeConfig {
                max_depth: 0,
                ..TreeConfig::default()
            },
        );
        assert_eq!(tree.n_leaves(), 1);
        // Leaf predicts the overall mean
        assert!((tree.predict_row(x.row(0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_split_on_step_function() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let targets = [0.0, 0.0, 1.0, 1.0];
        let tree = fit_all(&x, &targets, &TreeConfig::default());

        assert_eq!(tree.predict_row(x.row(0)), 0.0);
        assert_eq!(tree.predict_row(x.row(3)), 1.0);
    }

    #[test]
    fn test_constant_targets_stay_leaf() {
        let x = array![[0.0], [1.0], [2.0]];
        let targets = [0.7, 0.7, 0.7];
        let tree = fit_all(&x, &targets, &TreeConfig::default());
        assert_eq!(tree.n_leaves(), 1);
        assert!((tree.predict_row(x.row(1)) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_split_picks_informative_feature() {
        // Feature 0 is noise, feature 1 separates the targets
        let x = array![
            [5.0, 0.0],
            [1.0, 0.0],
            [4.0, 10.0],
            [2.0, 10.0]
        ];
        let targets = [0.0, 0.0, 1.0, 1.0];
        let tree = fit_all(&x, &targets, &TreeConfig::default());

        assert_eq!(tree.predict_row(array![3.0, 0.0].view()), 0.0);
        assert_eq!(tree.predict_row(array![3.0, 10.0].view()), 1.0);
    }

    #[test]
    fn test_feature_pool_restriction() {
        // Only the noise feature is in the pool, so no useful split exists
        let x = array![[5.0, 0.0], [5.0, 0.0], [5.0, 10.0], [5.0, 10.0]];
        let targets = [0.0, 0.0, 1.0, 1.0];
        let samples: Vec<usize> = (0..4).collect();
        let tree = RegressionTree::fit(
            &x,
            &targets,
            &samples,
            &[0],
            &TreeConfig::default(),
            &mut rng(),
        );
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn test_min_samples_split() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let targets = [0.0, 1.0, 0.0, 1.0];
        let tree = fit_all(
            &x,
            &targets,
            &TreeConfig {
                max_depth: 8,
                min_samples_split: 5,
                n_split_features: None,
            },
        );
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let targets = [0.0, 0.0, 1.0, 1.0];
        let tree = fit_all(&x, &targets, &TreeConfig::default());

        let json = serde_json::to_string(&tree).expect("serialize");
        let parsed: RegressionTree = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, tree);
    }
}
