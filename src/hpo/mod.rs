//! Hyperparameter search
//!
//! Parameter domains and randomized search:
//! - `types`: domains, search spaces, trials
//! - `random`: seeded random search over a space

mod error;
mod random;
mod types;

pub use error::{HpoError, Result};
pub use random::RandomSearch;
pub use types::{ParamConfig, ParameterDomain, ParameterValue, SearchSpace, Trial, TrialStatus};
