//! K-fold cross-validation
//!
//! Seeded LCG shuffle so folds are reproducible without threading an RNG
//! through callers.

use serde::{Deserialize, Serialize};

use super::select::Scoring;
use super::{Result, SelectError};
use crate::eval::BinaryConfusion;

/// K-fold splitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Create a new splitter with shuffling enabled.
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: true,
            seed: 42,
        }
    }

    /// Set the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Disable shuffling.
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    /// Generate (train, test) index pairs for each fold.
    pub fn split(&self, n_samples: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
        let mut indices: Vec<usize> = (0..n_samples).collect();

        if self.shuffle {
            let mut state = self.seed;
            for i in (1..n_samples).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                let j = (state >> 33) as usize % (i + 1);
                indices.swap(i, j);
            }
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let extra = usize::from(i < remainder);
            let end = start + fold_size + extra;

            let test: Vec<usize> = indices[start..end].to_vec();
            let train: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .copied()
                .collect();
            folds.push((train, test));
            start = end;
        }
        folds
    }
}

/// Mean fold score for a fit-and-predict closure.
///
/// The closure receives (train, test) row indices and returns hard
/// predictions for the test rows. Scores are F1 or recall of the positive
/// class per [`Scoring`].
pub fn cross_val_score<F>(
    y_true: &[u8],
    folds: usize,
    seed: u64,
    scoring: Scoring,
    mut fit_predict: F,
) -> Result<f64>
where
    F: FnMut(&[usize], &[usize]) -> Result<Vec<u8>>,
{
    if folds < 2 {
        return Err(SelectError::TooFewFolds(folds));
    }

    let kfold = KFold::new(folds).with_seed(seed);
    let mut scores = Vec::with_capacity(folds);

    for (train_idx, test_idx) in kfold.split(y_true.len()) {
        let preds = fit_predict(&train_idx, &test_idx)?;
        let test_labels: Vec<u8> = test_idx.iter().map(|&i| y_true[i]).collect();
        let cm = BinaryConfusion::from_labels(&test_labels, &preds)?;
        scores.push(match scoring {
            Scoring::F1 => cm.f1(),
            Scoring::Recall => cm.recall(),
        });
    }

    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}
