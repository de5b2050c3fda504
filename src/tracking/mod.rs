//! Experiment tracking
//!
//! Parameter, metric, and artifact logging for pipeline runs, backed by a
//! pluggable [`TrackingBackend`](storage::TrackingBackend).
//!
//! - **`ExperimentTracker`**: handle managing runs for a named experiment
//! - **`Run`**: one pipeline run with params, metrics, and artifacts
//! - **`TrackingBackend`**: pluggable persistence (JSON files, in-memory)
//!
//! # Example
//!
//! ```
//! use fiar::tracking::{ExperimentTracker, RunStatus};
//! use fiar::tracking::storage::InMemoryBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = ExperimentTracker::new("credit-default", InMemoryBackend::new());
//! let run_id = tracker.start_run(Some("pipeline-20250527"))?;
//! tracker.log_param(&run_id, "scoring", "f1")?;
//! tracker.log_metric(&run_id, "test_f1_score", 0.47, 0)?;
//! tracker.log_artifact(&run_id, "artifacts/eval/report.json")?;
//! tracker.end_run(&run_id, RunStatus::Completed)?;
//!
//! assert_eq!(tracker.list_runs()?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod storage;

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use storage::{TrackingBackend, TrackingStorageError};

/// Status of a tracking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is actively recording
    Active,
    /// Run completed successfully
    Completed,
    /// Run failed
    Failed,
    /// Run was cancelled
    Cancelled,
}

/// A single experiment run.
///
/// Tracks parameters, per-step metrics, artifact paths, and tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub run_id: String,
    pub run_name: Option<String>,
    pub experiment_name: String,
    pub status: RunStatus,
    /// Hyperparameters and settings: key -> string-encoded value
    pub params: HashMap<String, String>,
    /// Metrics: key -> list of (value, step)
    pub metrics: HashMap<String, Vec<(f64, u64)>>,
    /// Artifact paths
    pub artifacts: Vec<String>,
    /// Tags: key -> value
    pub tags: HashMap<String, String>,
    /// Unix timestamp (ms) when the run started
    pub start_time_ms: Option<i64>,
    /// Unix timestamp (ms) when the run ended
    pub end_time_ms: Option<i64>,
}

impl Run {
    fn new(run_id: String, run_name: Option<String>, experiment_name: String) -> Self {
        Self {
            run_id,
            run_name,
            experiment_name,
            status: RunStatus::Active,
            params: HashMap::new(),
            metrics: HashMap::new(),
            artifacts: Vec::new(),
            tags: HashMap::new(),
            start_time_ms: Some(Utc::now().timestamp_millis()),
            end_time_ms: None,
        }
    }

    /// Latest recorded value of a metric.
    pub fn latest_metric(&self, key: &str) -> Option<f64> {
        self.metrics
            .get(key)
            .and_then(|points| points.last())
            .map(|(value, _)| *value)
    }
}

/// Errors from experiment tracking operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error("run is not active: {0}")]
    RunNotActive(String),

    #[error("storage error: {0}")]
    Storage(#[from] TrackingStorageError),
}

/// Result alias for tracking operations.
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Experiment tracker managing runs under one experiment name.
#[derive(Debug)]
pub struct ExperimentTracker<B: TrackingBackend> {
    experiment_name: String,
    tags: HashMap<String, String>,
    backend: B,
    /// Active runs held in memory for fast mutation
    active_runs: HashMap<String, Run>,
    next_run_id: u64,
}

impl<B: TrackingBackend> ExperimentTracker<B> {
    /// Create a tracker for the given experiment name.
    pub fn new(experiment_name: impl Into<String>, backend: B) -> Self {
        Self {
            experiment_name: experiment_name.into(),
            tags: HashMap::new(),
            backend,
            active_runs: HashMap::new(),
            next_run_id: 1,
        }
    }

    /// Add an experiment-level tag inherited by new runs.
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// The experiment name.
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    /// Start a new run, optionally with a human-readable name. Returns the run ID.
    pub fn start_run(&mut self, run_name: Option<&str>) -> Result<String> {
        let run_id = format!("run-{}", self.next_run_id);
        self.next_run_id += 1;

        let mut run = Run::new(
            run_id.clone(),
            run_name.map(String::from),
            self.experiment_name.clone(),
        );
        for (k, v) in &self.tags {
            run.tags.insert(k.clone(), v.clone());
        }

        self.active_runs.insert(run_id.clone(), run);
        Ok(run_id)
    }

    /// End a run with the given status, persisting it to the backend.
    pub fn end_run(&mut self, run_id: &str, status: RunStatus) -> Result<()> {
        let mut run = self
            .active_runs
            .remove(run_id)
            .ok_or_else(|| TrackingError::RunNotFound(run_id.to_string()))?;

        run.status = status;
        run.end_time_ms = Some(Utc::now().timestamp_millis());
        self.backend.save_run(&run)?;
        Ok(())
    }

    fn active_mut(&mut self, run_id: &str) -> Result<&mut Run> {
        self.active_runs
            .get_mut(run_id)
            .ok_or_else(|| TrackingError::RunNotActive(run_id.to_string()))
    }

    /// Log a single parameter.
    pub fn log_param(&mut self, run_id: &str, key: &str, value: &str) -> Result<()> {
        self.active_mut(run_id)?
            .params
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Log multiple parameters at once.
    pub fn log_params(&mut self, run_id: &str, params: &HashMap<String, String>) -> Result<()> {
        let run = self.active_mut(run_id)?;
        for (k, v) in params {
            run.params.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    /// Log a metric value at a given step.
    pub fn log_metric(&mut self, run_id: &str, key: &str, value: f64, step: u64) -> Result<()> {
        self.active_mut(run_id)?
            .metrics
            .entry(key.to_string())
            .or_default()
            .push((value, step));
        Ok(())
    }

    /// Log an artifact path.
    pub fn log_artifact(&mut self, run_id: &str, path: &str) -> Result<()> {
        self.active_mut(run_id)?.artifacts.push(path.to_string());
        Ok(())
    }

    /// Retrieve a run by ID: active runs first, then the backend.
    pub fn get_run(&self, run_id: &str) -> Result<Run> {
        if let Some(run) = self.active_runs.get(run_id) {
            return Ok(run.clone());
        }
        self.backend
            .load_run(run_id)
            .map_err(|e| TrackingError::RunNotFound(format!("{run_id}: {e}")))
    }

    /// List all runs (active + persisted), sorted by run ID.
    pub fn list_runs(&self) -> Result<Vec<Run>> {
        let mut runs: Vec<Run> = self.active_runs.values().cloned().collect();
        for r in self.backend.list_runs()? {
            if !self.active_runs.contains_key(&r.run_id) {
                runs.push(r);
            }
        }
        runs.sort_by(|a, b| a.run_id.cmp(&b.run_id));
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::storage::InMemoryBackend;
    use super::*;

    fn tracker() -> ExperimentTracker<InMemoryBackend> {
        ExperimentTracker::new("credit-default", InMemoryBackend::new())
    }

    #[test]
    fn test_start_run_assigns_sequential_ids() {
        let mut t = tracker();
        let a = t.start_run(None).expect("start");
        let b = t.start_run(None).expect("start");
        assert_eq!(a, "run-1");
        assert_eq!(b, "run-2");
    }

    #[test]
    fn test_run_inherits_experiment_tags() {
        let mut t = tracker();
        t.add_tag("team", "risk");
        let id = t.start_run(Some("baseline")).expect("start");
        let run = t.get_run(&id).expect("get");
        assert_eq!(run.tags.get("team"), Some(&"risk".to_string()));
        assert_eq!(run.run_name.as_deref(), Some("baseline"));
    }

    #[test]
    fn test_log_and_read_back() {
        let mut t = tracker();
        let id = t.start_run(None).expect("start");
        t.log_param(&id, "scoring", "f1").expect("param");
        t.log_metric(&id, "loss", 0.5, 1).expect("metric");
        t.log_metric(&id, "loss", 0.3, 2).expect("metric");
        t.log_artifact(&id, "report.json").expect("artifact");

        let run = t.get_run(&id).expect("get");
        assert_eq!(run.params.get("scoring"), Some(&"f1".to_string()));
        assert_eq!(run.metrics["loss"], vec![(0.5, 1), (0.3, 2)]);
        assert_eq!(run.latest_metric("loss"), Some(0.3));
        assert_eq!(run.artifacts, vec!["report.json".to_string()]);
    }

    #[test]
    fn test_end_run_persists_to_backend() {
        let mut t = tracker();
        let id = t.start_run(None).expect("start");
        t.log_metric(&id, "test_f1_score", 0.47, 0).expect("metric");
        t.end_run(&id, RunStatus::Completed).expect("end");

        // No longer active, but still retrievable through the backend
        let run = t.get_run(&id).expect("get");
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.end_time_ms.is_some());
    }

    #[test]
    fn test_logging_to_ended_run_fails() {
        let mut t = tracker();
        let id = t.start_run(None).expect("start");
        t.end_run(&id, RunStatus::Failed).expect("end");
        assert!(matches!(
            t.log_param(&id, "k", "v"),
            Err(TrackingError::RunNotActive(_))
        ));
    }

    #[test]
    fn test_end_unknown_run_fails() {
        let mut t = tracker();
        assert!(matches!(
            t.end_run("run-99", RunStatus::Completed),
            Err(TrackingError::RunNotFound(_))
        ));
    }

    #[test]
    fn test_list_runs_merges_active_and_persisted() {
        let mut t = tracker();
        let a = t.start_run(None).expect("start");
        t.end_run(&a, RunStatus::Completed).expect("end");
        let _b = t.start_run(None).expect("start");

        let runs = t.list_runs().expect("list");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].run_id, "run-1");
        assert_eq!(runs[1].run_id, "run-2");
    }
}
