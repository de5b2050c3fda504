//! Configuration schema

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FiarError, Result};
use crate::eval::{CostSpec, EvalOptions, ThresholdGrid};
use crate::registry::Stage;
use crate::train::{Scoring, SelectionConfig};

/// Top-level `fiar.yaml` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiarConfig {
    /// Workspace directory per environment (dev/test/prod).
    #[serde(default)]
    pub workspaces: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub serve: ServeSettings,
}

impl FiarConfig {
    /// Workspace directory for an environment; explicit error when absent.
    pub fn workspace_dir(&self, env: Stage) -> Result<&Path> {
        self.workspaces
            .get(env.as_str())
            .map(PathBuf::as_path)
            .ok_or_else(|| FiarError::WorkspaceNotConfigured {
                env: env.as_str().to_string(),
            })
    }

    /// Model registry root inside a workspace.
    pub fn models_dir(&self, env: Stage) -> Result<PathBuf> {
        Ok(self.workspace_dir(env)?.join("models"))
    }

    /// Asset store root inside a workspace.
    pub fn assets_dir(&self, env: Stage) -> Result<PathBuf> {
        Ok(self.workspace_dir(env)?.join("assets"))
    }

    /// Tracking-run directory inside a workspace.
    pub fn runs_dir(&self, env: Stage) -> Result<PathBuf> {
        Ok(self.workspace_dir(env)?.join("runs"))
    }
}

/// Pipeline stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_input_data")]
    pub input_data: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fraction held out for validation + test (split in half).
    #[serde(default = "default_holdout")]
    pub holdout: f64,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub evaluation: EvaluationSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_data: default_input_data(),
            output_dir: default_output_dir(),
            label: default_label(),
            model_name: default_model_name(),
            seed: default_seed(),
            holdout: default_holdout(),
            selection: SelectionSettings::default(),
            evaluation: EvaluationSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Artifact path of the preprocess stage.
    pub fn splits_path(&self) -> PathBuf {
        self.output_dir.join("processed").join("splits.json")
    }

    /// Bundle directory written by the train stage.
    pub fn bundle_dir(&self) -> PathBuf {
        self.output_dir.join("model")
    }

    /// Report directory written by the evaluate stage.
    pub fn report_dir(&self) -> PathBuf {
        self.output_dir.join("eval")
    }
}

/// Model selection settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelectionSettings {
    #[serde(default = "default_n_iter")]
    pub n_iter: usize,
    #[serde(default = "default_cv_folds")]
    pub cv_folds: usize,
    #[serde(default = "default_scoring")]
    pub scoring: Scoring,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            n_iter: default_n_iter(),
            cv_folds: default_cv_folds(),
            scoring: default_scoring(),
        }
    }
}

impl SelectionSettings {
    /// Selection config with the pipeline seed applied.
    pub fn to_config(self, seed: u64) -> SelectionConfig {
        SelectionConfig {
            n_iter: self.n_iter,
            cv_folds: self.cv_folds,
            scoring: self.scoring,
            seed,
        }
    }
}

/// Threshold-evaluation settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvaluationSettings {
    #[serde(default = "default_grid")]
    pub grid: ThresholdGrid,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_cost_fp")]
    pub cost_fp: f64,
    #[serde(default = "default_cost_fn")]
    pub cost_fn: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            grid: default_grid(),
            beta: default_beta(),
            cost_fp: default_cost_fp(),
            cost_fn: default_cost_fn(),
        }
    }
}

impl EvaluationSettings {
    /// Evaluation options for the report stage.
    pub fn to_options(self) -> EvalOptions {
        EvalOptions {
            grid: self.grid,
            costs: CostSpec {
                cost_fp: self.cost_fp,
                cost_fn: self.cost_fn,
            },
            beta: self.beta,
        }
    }
}

/// Scoring service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeSettings {
    #[serde(default = "default_address")]
    pub address: String,
    /// Optional override of the bundle's tuned threshold.
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            threshold: None,
        }
    }
}

fn default_input_data() -> PathBuf {
    PathBuf::from("data/default_of_credit_card_clients.csv")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("artifacts")
}
fn default_label() -> String {
    "default_payment_next_month".to_string()
}
fn default_model_name() -> String {
    "credit-default-model".to_string()
}
fn default_seed() -> u64 {
    42
}
fn default_holdout() -> f64 {
    0.3
}
fn default_n_iter() -> usize {
    20
}
fn default_cv_folds() -> usize {
    3
}
fn default_scoring() -> Scoring {
    Scoring::F1
}
fn default_grid() -> ThresholdGrid {
    ThresholdGrid::default()
}
fn default_beta() -> f64 {
    1.0
}
fn default_cost_fp() -> f64 {
    1000.0
}
fn default_cost_fn() -> f64 {
    900.0
}
fn default_address() -> String {
    "127.0.0.1:8080".to_string()
}
