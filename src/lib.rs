//! Fiar: credit-default prediction pipeline
//!
//! End-to-end tooling for training and operating a credit-card default
//! classifier:
//!
//! - `data`: dataset ingest, cleaning, feature engineering, scaling, splits
//! - `model`: gradient boosting, random forest, and logistic regression
//! - `hpo`: hyperparameter domains and randomized search
//! - `train`: cross-validated model selection across families
//! - `eval`: threshold-optimized evaluation and report artifacts
//! - `tracking`: experiment runs with params, metrics, and artifacts
//! - `registry`: versioned data assets, model bundles, and stage promotion
//! - `pipeline`: preprocess → train → evaluate orchestration
//! - `serve`: HTTP scoring endpoint backed by a registered model
//!
//! # Example
//!
//! ```no_run
//! use fiar::config::load_config;
//! use fiar::pipeline::run_pipeline;
//! use fiar::tracking::storage::JsonFileBackend;
//! use fiar::tracking::ExperimentTracker;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fiar.yaml")?;
//! let backend = JsonFileBackend::new(".fiar/dev/runs");
//! let mut tracker = ExperimentTracker::new("credit-default", backend);
//! let outcome = run_pipeline(&config.pipeline, &mut tracker)?;
//! println!("best model: {}", outcome.report.model_name);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod hpo;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod serve;
pub mod tracking;
pub mod train;

pub use error::{FiarError, Result};
