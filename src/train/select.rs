//! Family search and winner selection
//!
//! For each classifier family: a randomized search over its space, scored
//! by cross-validated F1 or recall at the 0.5 cutoff. The best
//! configuration per family is compared across families with a strict `>`,
//! so the first family in [`crate::model::ModelFamily::ALL`] wins ties.
//! The winner is refitted on the full training set.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use super::cv::cross_val_score;
use super::{Result, SelectError};
use crate::hpo::{
    HpoError, ParamConfig, ParameterDomain, RandomSearch, SearchSpace, TrialStatus,
};
use crate::model::{
    BoostParams, Classifier, FittedModel, ForestParams, GradientBoost, LogisticParams,
    LogisticRegression, ModelFamily, RandomForest,
};

/// Selection scoring metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    F1,
    Recall,
}

impl Scoring {
    /// Stable name used in configs and run params.
    pub fn as_str(self) -> &'static str {
        match self {
            Scoring::F1 => "f1",
            Scoring::Recall => "recall",
        }
    }
}

impl std::str::FromStr for Scoring {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "f1" => Ok(Scoring::F1),
            "recall" => Ok(Scoring::Recall),
            other => Err(format!("unknown scoring metric: {other}")),
        }
    }
}

/// Selection knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub n_iter: usize,
    pub cv_folds: usize,
    pub scoring: Scoring,
    pub seed: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            n_iter: 20,
            cv_folds: 3,
            scoring: Scoring::F1,
            seed: 42,
        }
    }
}

/// Best configuration found for one family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyResult {
    pub family: ModelFamily,
    pub cv_score: f64,
    pub params: ParamConfig,
    pub n_trials: usize,
    pub n_failed: usize,
}

/// The selected model plus the per-family leaderboard.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub model: FittedModel,
    pub family: ModelFamily,
    pub cv_score: f64,
    pub params: ParamConfig,
    pub leaderboard: Vec<FamilyResult>,
}

/// Search space for one family, matching the tuned distributions.
pub fn family_search_space(family: ModelFamily) -> SearchSpace {
    match family {
        ModelFamily::Boost => SearchSpace::new()
            .with("n_estimators", ParameterDomain::Discrete { low: 100, high: 300 })
            .with("max_depth", ParameterDomain::Discrete { low: 3, high: 8 })
            .with("learning_rate", ParameterDomain::Continuous { low: 0.01, high: 0.21 })
            .with("subsample", ParameterDomain::Continuous { low: 0.7, high: 1.0 })
            .with("colsample", ParameterDomain::Continuous { low: 0.7, high: 1.0 }),
        ModelFamily::Forest => SearchSpace::new()
            .with("n_estimators", ParameterDomain::Discrete { low: 100, high: 300 })
            .with("max_depth", ParameterDomain::Discrete { low: 3, high: 10 })
            .with(
                "max_features",
                ParameterDomain::Categorical {
                    choices: vec!["sqrt".to_string(), "log2".to_string()],
                },
            ),
        ModelFamily::Logistic => SearchSpace::new()
            .with("c", ParameterDomain::Continuous { low: 0.1, high: 10.1 })
            .with(
                "penalty",
                ParameterDomain::Categorical {
                    choices: vec!["l1".to_string(), "l2".to_string()],
                },
            ),
    }
}

fn require_float(config: &ParamConfig, name: &str) -> Result<f64> {
    config
        .get(name)
        .and_then(|v| v.as_float())
        .ok_or_else(|| SelectError::Hpo(HpoError::ParameterNotFound(name.to_string())))
}

fn require_usize(config: &ParamConfig, name: &str) -> Result<usize> {
    config
        .get(name)
        .and_then(|v| v.as_int())
        .map(|v| v.max(0) as usize)
        .ok_or_else(|| SelectError::Hpo(HpoError::ParameterNotFound(name.to_string())))
}

fn require_parsed<T: std::str::FromStr>(config: &ParamConfig, name: &str) -> Result<T> {
    let raw = config
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| SelectError::Hpo(HpoError::ParameterNotFound(name.to_string())))?;
    raw.parse().map_err(|_| {
        SelectError::Hpo(HpoError::InvalidValue(name.to_string(), raw.to_string()))
    })
}

/// Fit a family with a sampled configuration.
fn fit_family(
    family: ModelFamily,
    config: &ParamConfig,
    x: &Array2<f64>,
    y: &[f64],
    seed: u64,
) -> Result<FittedModel> {
    match family {
        ModelFamily::Boost => {
            let params = BoostParams {
                n_estimators: require_usize(config, "n_estimators")?,
                max_depth: require_usize(config, "max_depth")?,
                learning_rate: require_float(config, "learning_rate")?,
                subsample: require_float(config, "subsample")?,
                colsample: require_float(config, "colsample")?,
                scale_pos_weight: 2.0,
            };
            Ok(FittedModel::Boost(GradientBoost::fit(&params, x, y, seed)?))
        }
        ModelFamily::Forest => {
            let params = ForestParams {
                n_estimators: require_usize(config, "n_estimators")?,
                max_depth: require_usize(config, "max_depth")?,
                max_features: require_parsed(config, "max_features")?,
            };
            Ok(FittedModel::Forest(RandomForest::fit(&params, x, y, seed)?))
        }
        ModelFamily::Logistic => {
            let params = LogisticParams {
                c: require_float(config, "c")?,
                penalty: require_parsed(config, "penalty")?,
                ..LogisticParams::default()
            };
            Ok(FittedModel::Logistic(LogisticRegression::fit(&params, x, y)?))
        }
    }
}

fn cv_objective(
    family: ModelFamily,
    config: &ParamConfig,
    x: &Array2<f64>,
    y: &[u8],
    selection: &SelectionConfig,
) -> Result<f64> {
    let targets: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
    cross_val_score(
        y,
        selection.cv_folds,
        selection.seed,
        selection.scoring,
        |train_idx, test_idx| {
            let x_train = x.select(Axis(0), train_idx);
            let y_train: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();
            let x_test = x.select(Axis(0), test_idx);
            let model = fit_family(family, config, &x_train, &y_train, selection.seed)?;
            Ok(model.predict(&x_test, 0.5))
        },
    )
}

/// Run the per-family searches and refit the overall winner.
pub fn select_best_model(
    x: &Array2<f64>,
    y: &[u8],
    config: &SelectionConfig,
) -> Result<SelectionOutcome> {
    if config.cv_folds < 2 {
        return Err(SelectError::TooFewFolds(config.cv_folds));
    }

    let mut leaderboard = Vec::with_capacity(ModelFamily::ALL.len());
    let mut winner: Option<FamilyResult> = None;

    for family in ModelFamily::ALL {
        let search = RandomSearch::new(family_search_space(family), config.n_iter, config.seed);
        let trials =
            search.run(|params| cv_objective(family, params, x, y, config).map_err(|e| e.to_string()))?;

        let n_failed = trials.iter().filter(|t| t.status == TrialStatus::Failed).count();
        let best = RandomSearch::best(&trials)?;
        let result = FamilyResult {
            family,
            cv_score: best.score,
            params: best.config.clone(),
            n_trials: trials.len(),
            n_failed,
        };

        // Strict comparison: the earlier family keeps the crown on ties
        if winner.as_ref().map_or(true, |w| result.cv_score > w.cv_score) {
            winner = Some(result.clone());
        }
        leaderboard.push(result);
    }

    let winner = winner.ok_or(SelectError::NoWinner)?;
    let targets: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
    let model = fit_family(winner.family, &winner.params, x, &targets, config.seed)?;

    Ok(SelectionOutcome {
        model,
        family: winner.family,
        cv_score: winner.cv_score,
        params: winner.params,
        leaderboard,
    })
}
