//! Random search over a parameter space
//!
//! Samples a fixed number of configurations from the space with a seeded
//! RNG and scores each with a caller-supplied objective (higher is better).
//! A failing objective marks its trial failed and the search continues.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::error::{HpoError, Result};
use super::types::{ParamConfig, SearchSpace, Trial, TrialStatus};

/// Randomized hyperparameter search.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    space: SearchSpace,
    n_iter: usize,
    seed: u64,
}

impl RandomSearch {
    /// Create a search drawing `n_iter` configurations.
    pub fn new(space: SearchSpace, n_iter: usize, seed: u64) -> Self {
        Self {
            space,
            n_iter,
            seed,
        }
    }

    /// Run the search, scoring each sampled configuration.
    ///
    /// Returns all trials in sampling order.
    pub fn run<F>(&self, mut objective: F) -> Result<Vec<Trial>>
    where
        F: FnMut(&ParamConfig) -> std::result::Result<f64, String>,
    {
        if self.space.is_empty() {
            return Err(HpoError::EmptySpace);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trials = Vec::with_capacity(self.n_iter);

        for id in 0..self.n_iter {
            let config = self.space.sample(&mut rng);
            let mut trial = Trial::new(id, config);
            match objective(&trial.config) {
                Ok(score) => trial.complete(score),
                Err(_) => trial.fail(),
            }
            trials.push(trial);
        }

        Ok(trials)
    }

    /// Best completed trial: highest score, ties broken by lowest id.
    pub fn best(trials: &[Trial]) -> Result<&Trial> {
        trials
            .iter()
            .filter(|t| t.status == TrialStatus::Completed)
            .fold(None::<&Trial>, |best, t| match best {
                Some(b) if t.score > b.score => Some(t),
                Some(b) => Some(b),
                None => Some(t),
            })
            .ok_or(HpoError::NoCompletedTrials)
    }
}
