//! Regularized logistic regression
//!
//! Full-batch gradient descent on the mean log loss. `c` is the inverse
//! regularization strength; l2 adds the gradient of the penalty, l1 applies
//! a proximal soft-threshold after each step.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{check_training_set, sigmoid, Classifier, ModelError, Result};

/// Regularization penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Penalty {
    L1,
    L2,
}

impl Penalty {
    /// Stable name used in search spaces.
    pub fn as_str(self) -> &'static str {
        match self {
            Penalty::L1 => "l1",
            Penalty::L2 => "l2",
        }
    }
}

impl std::str::FromStr for Penalty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "l1" => Ok(Penalty::L1),
            "l2" => Ok(Penalty::L2),
            other => Err(format!("unknown penalty: {other}")),
        }
    }
}

/// Logistic regression hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularization strength.
    pub c: f64,
    pub penalty: Penalty,
    pub max_iter: usize,
    pub learning_rate: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            penalty: Penalty::L2,
            max_iter: 500,
            learning_rate: 0.1,
        }
    }
}

/// A fitted logistic regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticRegression {
    /// Fit by gradient descent. Assumes standardized features.
    pub fn fit(params: &LogisticParams, x: &Array2<f64>, y: &[f64]) -> Result<Self> {
        check_training_set(x, y)?;
        if params.c <= 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "c must be positive, got {}",
                params.c
            )));
        }

        let n = x.nrows();
        let d = x.ncols();
        let n_f = n as f64;
        let reg = 1.0 / (params.c * n_f);

        let mut weights = vec![0.0; d];
        let mut bias = 0.0;
        let mut grad = vec![0.0; d];

        for _ in 0..params.max_iter {
            grad.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_bias = 0.0;

            for i in 0..n {
                let row = x.row(i);
                let z = bias + row.iter().zip(&weights).map(|(xi, wi)| xi * wi).sum::<f64>();
                let err = sigmoid(z) - y[i];
                for (g, xi) in grad.iter_mut().zip(row.iter()) {
                    *g += err * xi;
                }
                grad_bias += err;
            }

            for (w, g) in weights.iter_mut().zip(&grad) {
                let mut step = g / n_f;
                if params.penalty == Penalty::L2 {
                    step += reg * *w;
                }
                *w -= params.learning_rate * step;
            }
            bias -= params.learning_rate * grad_bias / n_f;

            if params.penalty == Penalty::L1 {
                let shrink = params.learning_rate * reg;
                for w in weights.iter_mut() {
                    *w = w.signum() * (w.abs() - shrink).max(0.0);
                }
            }
        }

        Ok(Self { weights, bias })
    }

    /// Fitted coefficients.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Fitted intercept.
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl Classifier for LogisticRegression {
    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows()
            .into_iter()
            .map(|row| {
                let z = self.bias
                    + row.iter().zip(&self.weights).map(|(xi, wi)| xi * wi).sum::<f64>();
                sigmoid(z)
            })
            .collect()
    }
}
