//! Dataset ingest and preparation
//!
//! Takes the raw credit-clients table from CSV to model-ready matrices:
//!
//! - `frame`: column-named numeric table with CSV ingest
//! - `clean`: drop the row id, treat zero-coded categoricals as missing
//! - `features`: engineered payment/bill aggregate columns
//! - `scale`: per-column standardization with a persisted scaler
//! - `split`: seeded stratified train/val/test split

mod clean;
mod features;
mod frame;
mod scale;
mod split;

use thiserror::Error;

pub use clean::clean;
pub use features::engineer_features;
pub use frame::Frame;
pub use scale::StandardScaler;
pub use split::{stratified_split, SplitBundle, SplitPart};

/// Errors from dataset loading and preparation.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("non-numeric value in column '{column}' at row {row}")]
    NonNumeric { column: String, row: usize },

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("no rows left after cleaning")]
    EmptyFrame,

    #[error("label at row {row} is {value}, expected 0 or 1")]
    InvalidLabel { row: usize, value: f64 },

    #[error("feature count mismatch: scaler has {expected} features, input has {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("unknown feature in scoring record: {0}")]
    UnknownFeature(String),

    #[error("scoring record is missing feature: {0}")]
    MissingFeature(String),
}

/// Result alias for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
