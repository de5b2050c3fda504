//! Binary classification metrics
//!
//! Confusion counts with the derived rates, plus a rank-based ROC AUC with
//! midrank tie handling. Reference values in the tests were computed with
//! sklearn 1.4.0.

use serde::{Deserialize, Serialize};

use super::{check_inputs, EvalError, Result};

/// Confusion counts for a binary problem (positive class = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryConfusion {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

impl BinaryConfusion {
    /// Count from hard labels.
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Result<Self> {
        if y_true.is_empty() {
            return Err(EvalError::Empty);
        }
        if y_true.len() != y_pred.len() {
            return Err(EvalError::LengthMismatch {
                labels: y_true.len(),
                scores: y_pred.len(),
            });
        }

        let mut cm = Self {
            tp: 0,
            fp: 0,
            tn: 0,
            fn_: 0,
        };
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t, p) {
                (1, 1) => cm.tp += 1,
                (0, 1) => cm.fp += 1,
                (0, 0) => cm.tn += 1,
                _ => cm.fn_ += 1,
            }
        }
        Ok(cm)
    }

    /// Total number of samples.
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Fraction of correct predictions.
    pub fn accuracy(&self) -> f64 {
        (self.tp + self.tn) as f64 / self.total() as f64
    }

    /// Positive predictive value; 0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        let denom = self.tp + self.fp;
        if denom == 0 {
            0.0
        } else {
            self.tp as f64 / denom as f64
        }
    }

    /// True positive rate; 0 when there are no positives.
    pub fn recall(&self) -> f64 {
        let denom = self.tp + self.fn_;
        if denom == 0 {
            0.0
        } else {
            self.tp as f64 / denom as f64
        }
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        self.fbeta(1.0)
    }

    /// F-beta score; beta > 1 weights recall higher.
    pub fn fbeta(&self, beta: f64) -> f64 {
        let p = self.precision();
        let r = self.recall();
        let b2 = beta * beta;
        let denom = b2 * p + r;
        if denom == 0.0 {
            0.0
        } else {
            (1.0 + b2) * p * r / denom
        }
    }

    /// sklearn-layout matrix: `[[tn, fp], [fn, tp]]`.
    pub fn as_matrix(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

/// Hard labels from probabilities at a cutoff (`p >= threshold` → 1).
pub fn threshold_predictions(probas: &[f64], threshold: f64) -> Vec<u8> {
    probas.iter().map(|&p| u8::from(p >= threshold)).collect()
}

/// Area under the ROC curve via rank statistics with midrank ties.
///
/// Errors when the labels contain a single class.
pub fn roc_auc(y_true: &[u8], scores: &[f64]) -> Result<f64> {
    check_inputs(y_true, scores)?;

    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&v| v == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(EvalError::SingleClass);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // 1-based midranks over tied score groups
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = midrank;
        }
        i = j + 1;
    }

    let sum_pos: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(&t, _)| t == 1)
        .map(|(_, &r)| r)
        .sum();

    let n_pos_f = n_pos as f64;
    Ok((sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg as f64))
}
