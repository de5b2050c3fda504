//! Model selection
//!
//! Cross-validated comparison of classifier families:
//! - `cv`: seeded k-fold splitter and fold-mean scoring
//! - `select`: per-family randomized search and the overall winner

mod cv;
mod select;

use thiserror::Error;

pub use cv::{cross_val_score, KFold};
pub use select::{
    family_search_space, select_best_model, FamilyResult, Scoring, SelectionConfig,
    SelectionOutcome,
};

use crate::eval::EvalError;
use crate::hpo::HpoError;
use crate::model::ModelError;

/// Errors from model selection.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("search error: {0}")]
    Hpo(#[from] HpoError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("cv_folds must be at least 2, got {0}")]
    TooFewFolds(usize),

    #[error("no model family produced a completed trial")]
    NoWinner,
}

/// Result alias for selection operations.
pub type Result<T> = std::result::Result<T, SelectError>;
