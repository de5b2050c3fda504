//! Classifier families
//!
//! Three families mirror the candidate set searched during model selection:
//!
//! - `boost`: gradient-boosted trees on the logistic loss
//! - `forest`: bootstrap-aggregated probability trees
//! - `logistic`: l1/l2-regularized logistic regression
//!
//! All of them implement [`Classifier`] and serialize through the
//! [`FittedModel`] enum, which is the on-disk form inside a model bundle.

mod boost;
mod forest;
mod logistic;
mod tree;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use boost::{BoostParams, GradientBoost};
pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use logistic::{LogisticParams, LogisticRegression, Penalty};
pub use tree::{RegressionTree, TreeConfig};

/// Errors from model fitting.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature matrix has {rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("training labels contain a single class")]
    SingleClass,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// A fitted binary classifier producing positive-class probabilities.
pub trait Classifier {
    /// Probability of the positive class for each row.
    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64>;

    /// Hard labels at the given probability threshold (`p >= threshold`).
    fn predict(&self, x: &Array2<f64>, threshold: f64) -> Vec<u8> {
        self.predict_proba(x)
            .iter()
            .map(|&p| u8::from(p >= threshold))
            .collect()
    }
}

/// Classifier family identifier, in selection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    Boost,
    Forest,
    Logistic,
}

impl ModelFamily {
    /// All families in the order model selection visits them.
    pub const ALL: [ModelFamily; 3] =
        [ModelFamily::Boost, ModelFamily::Forest, ModelFamily::Logistic];

    /// Stable name used in reports and registry tags.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelFamily::Boost => "gradient_boost",
            ModelFamily::Forest => "random_forest",
            ModelFamily::Logistic => "logistic_regression",
        }
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serializable fitted model, tagged by family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", content = "model")]
pub enum FittedModel {
    Boost(GradientBoost),
    Forest(RandomForest),
    Logistic(LogisticRegression),
}

impl FittedModel {
    /// Family of the wrapped model.
    pub fn family(&self) -> ModelFamily {
        match self {
            FittedModel::Boost(_) => ModelFamily::Boost,
            FittedModel::Forest(_) => ModelFamily::Forest,
            FittedModel::Logistic(_) => ModelFamily::Logistic,
        }
    }
}

impl Classifier for FittedModel {
    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        match self {
            FittedModel::Boost(m) => m.predict_proba(x),
            FittedModel::Forest(m) => m.predict_proba(x),
            FittedModel::Logistic(m) => m.predict_proba(x),
        }
    }
}

/// Logistic sigmoid.
pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Validate a binary training set before fitting.
pub(crate) fn check_training_set(x: &Array2<f64>, y: &[f64]) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::LengthMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    let positives = y.iter().filter(|&&v| v == 1.0).count();
    if positives == 0 || positives == y.len() {
        return Err(ModelError::SingleClass);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_check_training_set_rejects_empty() {
        let x = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            check_training_set(&x, &[]),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_check_training_set_rejects_length_mismatch() {
        let x = array![[1.0], [2.0]];
        assert!(matches!(
            check_training_set(&x, &[1.0]),
            Err(ModelError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_check_training_set_rejects_single_class() {
        let x = array![[1.0], [2.0]];
        assert!(matches!(
            check_training_set(&x, &[1.0, 1.0]),
            Err(ModelError::SingleClass)
        ));
    }

    #[test]
    fn test_family_order_and_names() {
        let names: Vec<&str> = ModelFamily::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            ["gradient_boost", "random_forest", "logistic_regression"]
        );
    }

    #[test]
    fn test_fitted_model_serde_tagged() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = [0.0, 0.0, 1.0, 1.0];
        let model = LogisticRegression::fit(&LogisticParams::default(), &x, &y)
            .expect("fit logistic");
        let fitted = FittedModel::Logistic(model);

        let json = serde_json::to_string(&fitted).expect("serialize");
        assert!(json.contains("\"family\":\"Logistic\""));
        let parsed: FittedModel = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.family(), ModelFamily::Logistic);
        assert_eq!(parsed, fitted);
    }

    #[test]
    fn test_default_predict_uses_threshold() {
        struct Fixed(Vec<f64>);
        impl Classifier for Fixed {
            fn predict_proba(&self, _x: &Array2<f64>) -> Vec<f64> {
                self.0.clone()
            }
        }
        let c = Fixed(vec![0.2, 0.5, 0.8]);
        let x = Array2::<f64>::zeros((3, 1));
        assert_eq!(c.predict(&x, 0.5), vec![0, 1, 1]);
        assert_eq!(c.predict(&x, 0.9), vec![0, 0, 0]);
    }
}
