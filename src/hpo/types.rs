//! Core HPO types

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::{HpoError, Result};

/// A sampled parameter configuration.
pub type ParamConfig = HashMap<String, ParameterValue>;

/// Parameter value (sampled from a domain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Float(f64),
    Int(i64),
    Categorical(String),
}

impl ParameterValue {
    /// Get as float (converts int to float if needed)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Int(v) => Some(*v as f64),
            ParameterValue::Categorical(_) => None,
        }
    }

    /// Get as int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(v) => Some(*v),
            ParameterValue::Float(v) => Some(*v as i64),
            ParameterValue::Categorical(_) => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Categorical(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Float(v) => write!(f, "{v:.6}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Categorical(s) => write!(f, "{s}"),
        }
    }
}

/// Parameter domain (search space for one knob)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParameterDomain {
    /// Continuous range [low, high)
    Continuous { low: f64, high: f64 },
    /// Discrete integer range [low, high)
    Discrete { low: i64, high: i64 },
    /// Categorical choices
    Categorical { choices: Vec<String> },
}

impl ParameterDomain {
    /// Sample a random value from this domain
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        match self {
            ParameterDomain::Continuous { low, high } => {
                ParameterValue::Float(low + rng.random::<f64>() * (high - low))
            }
            ParameterDomain::Discrete { low, high } => {
                let range = (*high - *low).max(1) as u64;
                let offset = (rng.random::<f64>() * range as f64).floor() as i64;
                ParameterValue::Int((*low + offset).min(*high - 1))
            }
            ParameterDomain::Categorical { choices } => {
                let idx = (rng.random::<f64>() * choices.len() as f64).floor() as usize;
                ParameterValue::Categorical(choices[idx.min(choices.len() - 1)].clone())
            }
        }
    }

    /// Check if a value is valid for this domain
    pub fn is_valid(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ParameterDomain::Continuous { low, high }, ParameterValue::Float(v)) => {
                *v >= *low && *v < *high
            }
            (ParameterDomain::Discrete { low, high }, ParameterValue::Int(v)) => {
                *v >= *low && *v < *high
            }
            (ParameterDomain::Categorical { choices }, ParameterValue::Categorical(s)) => {
                choices.contains(s)
            }
            _ => false,
        }
    }
}

/// Named parameter domains making up a search space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSpace {
    params: Vec<(String, ParameterDomain)>,
}

impl SearchSpace {
    /// Create an empty search space
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the search space (builder form).
    pub fn with(mut self, name: &str, domain: ParameterDomain) -> Self {
        self.add(name, domain);
        self
    }

    /// Add a parameter to the search space
    pub fn add(&mut self, name: &str, domain: ParameterDomain) {
        self.params.push((name.to_string(), domain));
    }

    /// Get a parameter domain
    pub fn get(&self, name: &str) -> Option<&ParameterDomain> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    /// Check if space is empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterate over parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterDomain)> {
        self.params.iter().map(|(n, d)| (n, d))
    }

    /// Sample a random configuration
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParamConfig {
        self.params
            .iter()
            .map(|(name, domain)| (name.clone(), domain.sample(rng)))
            .collect()
    }

    /// Validate a configuration against the space
    pub fn validate(&self, config: &ParamConfig) -> Result<()> {
        for (name, domain) in &self.params {
            match config.get(name) {
                Some(value) if domain.is_valid(value) => {}
                Some(value) => {
                    return Err(HpoError::InvalidValue(name.clone(), format!("{value:?}")))
                }
                None => return Err(HpoError::ParameterNotFound(name.clone())),
            }
        }
        Ok(())
    }
}

/// A single trial (configuration + score, higher is better)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Trial ID (assignment order)
    pub id: usize,
    /// Parameter configuration
    pub config: ParamConfig,
    /// Objective score; higher is better
    pub score: f64,
    /// Trial status
    pub status: TrialStatus,
}

impl Trial {
    /// Create a new pending trial
    pub fn new(id: usize, config: ParamConfig) -> Self {
        Self {
            id,
            config,
            score: f64::NEG_INFINITY,
            status: TrialStatus::Pending,
        }
    }

    /// Mark trial as complete with score
    pub fn complete(&mut self, score: f64) {
        self.score = score;
        self.status = TrialStatus::Completed;
    }

    /// Mark trial as failed
    pub fn fail(&mut self) {
        self.status = TrialStatus::Failed;
    }
}

/// Trial status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Pending,
    Completed,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // ParameterValue Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_parameter_value_float() {
        let v = ParameterValue::Float(0.5);
        assert_eq!(v.as_float(), Some(0.5));
        assert_eq!(v.as_int(), Some(0));
        assert_eq!(v.as_str(), None);
    }

    #[test]
    fn test_parameter_value_int() {
        let v = ParameterValue::Int(42);
        assert_eq!(v.as_float(), Some(42.0));
        assert_eq!(v.as_int(), Some(42));
    }

    #[test]
    fn test_parameter_value_categorical() {
        let v = ParameterValue::Categorical("sqrt".to_string());
        assert_eq!(v.as_float(), None);
        assert_eq!(v.as_str(), Some("sqrt"));
    }

    // -------------------------------------------------------------------------
    // ParameterDomain Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_domain_continuous_sample() {
        let domain = ParameterDomain::Continuous { low: 0.01, high: 0.21 };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let value = domain.sample(&mut rng);
            assert!(domain.is_valid(&value));
        }
    }

    #[test]
    fn test_domain_discrete_sample() {
        let domain = ParameterDomain::Discrete { low: 100, high: 300 };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let value = domain.sample(&mut rng);
            assert!(domain.is_valid(&value));
        }
    }

    #[test]
    fn test_domain_categorical_sample() {
        let domain = ParameterDomain::Categorical {
            choices: vec!["l1".to_string(), "l2".to_string()],
        };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let value = domain.sample(&mut rng);
            assert!(domain.is_valid(&value));
        }
    }

    #[test]
    fn test_domain_bounds_are_half_open() {
        let domain = ParameterDomain::Discrete { low: 3, high: 8 };
        assert!(domain.is_valid(&ParameterValue::Int(3)));
        assert!(domain.is_valid(&ParameterValue::Int(7)));
        assert!(!domain.is_valid(&ParameterValue::Int(8)));
    }

    #[test]
    fn test_domain_type_mismatch_invalid() {
        let domain = ParameterDomain::Discrete { low: 0, high: 10 };
        assert!(!domain.is_valid(&ParameterValue::Float(5.0)));

        let domain = ParameterDomain::Categorical { choices: vec!["a".to_string()] };
        assert!(!domain.is_valid(&ParameterValue::Int(0)));
    }

    // -------------------------------------------------------------------------
    // SearchSpace Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_space_builder() {
        let space = SearchSpace::new()
            .with("n_estimators", ParameterDomain::Discrete { low: 100, high: 300 })
            .with("learning_rate", ParameterDomain::Continuous { low: 0.01, high: 0.21 });
        assert_eq!(space.len(), 2);
        assert!(space.get("n_estimators").is_some());
        assert!(space.get("unknown").is_none());
    }

    #[test]
    fn test_space_preserves_insertion_order() {
        let space = SearchSpace::new()
            .with("b", ParameterDomain::Discrete { low: 0, high: 2 })
            .with("a", ParameterDomain::Discrete { low: 0, high: 2 });
        let names: Vec<&str> = space.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_space_sample_validates() {
        let space = SearchSpace::new()
            .with("c", ParameterDomain::Continuous { low: 0.1, high: 10.1 })
            .with(
                "penalty",
                ParameterDomain::Categorical { choices: vec!["l1".to_string(), "l2".to_string()] },
            );
        let mut rng = rand::rng();
        let config = space.sample(&mut rng);
        assert!(config.contains_key("c"));
        assert!(config.contains_key("penalty"));
        assert!(space.validate(&config).is_ok());
    }

    #[test]
    fn test_space_validate_failures() {
        let space =
            SearchSpace::new().with("c", ParameterDomain::Continuous { low: 0.0, high: 1.0 });

        let mut bad = ParamConfig::new();
        bad.insert("c".to_string(), ParameterValue::Float(2.0));
        assert!(matches!(space.validate(&bad), Err(HpoError::InvalidValue(..))));

        let missing = ParamConfig::new();
        assert!(matches!(
            space.validate(&missing),
            Err(HpoError::ParameterNotFound(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Trial Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_trial_lifecycle() {
        let mut trial = Trial::new(0, ParamConfig::new());
        assert_eq!(trial.status, TrialStatus::Pending);
        assert_eq!(trial.score, f64::NEG_INFINITY);

        trial.complete(0.74);
        assert_eq!(trial.status, TrialStatus::Completed);
        assert_eq!(trial.score, 0.74);

        let mut failed = Trial::new(1, ParamConfig::new());
        failed.fail();
        assert_eq!(failed.status, TrialStatus::Failed);
    }

    #[test]
    fn test_trial_serde() {
        let mut config = ParamConfig::new();
        config.insert("c".to_string(), ParameterValue::Float(0.5));
        let mut trial = Trial::new(3, config);
        trial.complete(0.61);

        let json = serde_json::to_string(&trial).expect("serialize");
        let parsed: Trial = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.id, 3);
        assert_eq!(parsed.score, 0.61);
        assert_eq!(parsed.status, TrialStatus::Completed);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_continuous_domain_valid(low in -100.0f64..0.0, high in 1.0f64..100.0) {
            let domain = ParameterDomain::Continuous { low, high };
            let mut rng = rand::rng();
            let value = domain.sample(&mut rng);
            prop_assert!(domain.is_valid(&value));
        }

        #[test]
        fn prop_discrete_domain_valid(low in -100i64..0, high in 1i64..100) {
            let domain = ParameterDomain::Discrete { low, high };
            let mut rng = rand::rng();
            let value = domain.sample(&mut rng);
            prop_assert!(domain.is_valid(&value));
        }

        #[test]
        fn prop_space_sample_validates(
            lo in 0.0f64..0.5,
            hi in 1.0f64..10.0,
            n_lo in 1i64..50,
            n_hi in 100i64..500
        ) {
            let space = SearchSpace::new()
                .with("c", ParameterDomain::Continuous { low: lo, high: hi })
                .with("n", ParameterDomain::Discrete { low: n_lo, high: n_hi });
            let mut rng = rand::rng();
            let config = space.sample(&mut rng);
            prop_assert!(space.validate(&config).is_ok());
        }
    }
}
