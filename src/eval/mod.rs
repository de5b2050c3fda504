//! Threshold-optimized evaluation
//!
//! - `metrics`: binary confusion counts, precision/recall/F-beta, ROC AUC
//! - `threshold`: grid search for the cost- or F-beta-optimal cutoff
//! - `curves`: ROC and precision-recall point series
//! - `report`: evaluation report plus on-disk artifacts

mod curves;
mod metrics;
mod report;
mod threshold;

use thiserror::Error;

pub use curves::{pr_curve, roc_curve, PrPoint, RocPoint};
pub use metrics::{roc_auc, threshold_predictions, BinaryConfusion};
pub use report::{
    evaluate_model, write_report_artifacts, EvalOptions, EvaluationReport, ReportArtifacts,
};
pub use threshold::{optimize_cost, optimize_fbeta, CostSpec, ThresholdChoice, ThresholdGrid};

/// Errors from evaluation routines.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("labels and scores differ in length: {labels} vs {scores}")]
    LengthMismatch { labels: usize, scores: usize },

    #[error("evaluation inputs are empty")]
    Empty,

    #[error("labels contain a single class; ranking metrics are undefined")]
    SingleClass,

    #[error("probability at index {index} is not finite")]
    NonFiniteProbability { index: usize },

    #[error("invalid threshold grid: {0}")]
    InvalidGrid(String),

    #[error("invalid beta: {0} (must be positive)")]
    InvalidBeta(f64),
}

/// Result alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

pub(crate) fn check_inputs(y_true: &[u8], scores: &[f64]) -> Result<()> {
    if y_true.is_empty() {
        return Err(EvalError::Empty);
    }
    if y_true.len() != scores.len() {
        return Err(EvalError::LengthMismatch {
            labels: y_true.len(),
            scores: scores.len(),
        });
    }
    for (index, p) in scores.iter().enumerate() {
        if !p.is_finite() {
            return Err(EvalError::NonFiniteProbability { index });
        }
    }
    Ok(())
}
