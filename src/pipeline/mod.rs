//! Pipeline orchestration
//!
//! Preprocess -> train -> evaluate, each stage reading the previous
//! stage's artifacts from disk and writing its own under the configured
//! output directory. `run_pipeline` wires the stages together under a
//! tracked run and fails loudly on the first stage error.

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::data::{clean, engineer_features, DataError, Frame, SplitBundle};
use crate::error::FiarError;
use crate::eval::{
    evaluate_model, write_report_artifacts, EvalError, EvaluationReport, ReportArtifacts,
};
use crate::io::{save_json, Bundle, DeploySpec};
use crate::model::Classifier;
use crate::registry::RegistryError;
use crate::tracking::{ExperimentTracker, RunStatus, TrackingError};
use crate::tracking::storage::TrackingBackend;
use crate::train::{select_best_model, SelectError, SelectionOutcome};

/// Errors from pipeline stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("preprocess error: {0}")]
    Data(#[from] DataError),

    #[error("training error: {0}")]
    Select(#[from] SelectError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error(transparent)]
    Artifact(#[from] FiarError),
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything produced by a full pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub run_id: String,
    pub run_name: String,
    pub splits_path: PathBuf,
    pub bundle_dir: PathBuf,
    pub selection: SelectionOutcome,
    pub report: EvaluationReport,
    pub artifacts: ReportArtifacts,
}

/// Preprocess stage: ingest, clean, engineer, scale, split; persist splits.
pub fn preprocess_stage(config: &PipelineConfig) -> Result<SplitBundle> {
    let mut frame = Frame::from_csv_path(&config.input_data)?;
    clean(&mut frame)?;
    engineer_features(&mut frame)?;
    let (features, labels) = frame.split_features_labels(&config.label)?;
    let bundle = SplitBundle::build(&features, &labels, config.holdout, config.seed)?;
    bundle.save(config.splits_path())?;
    Ok(bundle)
}

/// Train stage: cross-validated family selection over the persisted splits;
/// persist the winning bundle.
pub fn train_stage(config: &PipelineConfig) -> Result<(Bundle, SelectionOutcome)> {
    let splits = SplitBundle::load(config.splits_path())?;
    let x_train = splits.train.to_matrix();

    let selection_config = config.selection.to_config(config.seed);
    let selection = select_best_model(&x_train, &splits.train.y, &selection_config)?;

    let bundle = Bundle {
        model: selection.model.clone(),
        scaler: splits.scaler.clone(),
        deploy: DeploySpec {
            model_name: config.model_name.clone(),
            family: selection.family.as_str().to_string(),
            cv_score: selection.cv_score,
            // Placeholder until the evaluate stage tunes the cutoff
            threshold: 0.5,
            beta: config.evaluation.beta,
            trained_at: Utc::now(),
        },
    };
    bundle.save(config.bundle_dir())?;
    Ok((bundle, selection))
}

/// Evaluate stage: threshold-tuned test-set report; update the bundle's
/// deployed threshold and write report artifacts.
pub fn evaluate_stage(config: &PipelineConfig) -> Result<(EvaluationReport, ReportArtifacts)> {
    let splits = SplitBundle::load(config.splits_path())?;
    let mut bundle = Bundle::load(config.bundle_dir())?;

    let x_test = splits.test.to_matrix();
    let probas = bundle.model.predict_proba(&x_test);
    let report = evaluate_model(
        &config.model_name,
        &bundle.deploy.family,
        &splits.test.y,
        &probas,
        &config.evaluation.to_options(),
    )?;

    let artifacts =
        write_report_artifacts(config.report_dir(), &report, &splits.test.y, &probas)?;

    bundle.deploy.threshold = report.threshold;
    save_json(
        config.bundle_dir().join(Bundle::DEPLOY_FILE),
        &bundle.deploy,
    )?;

    Ok((report, artifacts))
}

/// Run the full pipeline under a tracked run.
pub fn run_pipeline<B: TrackingBackend>(
    config: &PipelineConfig,
    tracker: &mut ExperimentTracker<B>,
) -> Result<PipelineOutcome> {
    let run_name = format!(
        "credit-default-pipeline-{}",
        Utc::now().format("%Y%m%d%H%M%S")
    );
    let run_id = tracker.start_run(Some(&run_name))?;

    match run_stages(config, tracker, &run_id) {
        Ok(outcome) => {
            tracker.end_run(&run_id, RunStatus::Completed)?;
            Ok(PipelineOutcome {
                run_id,
                run_name,
                ..outcome
            })
        }
        Err(e) => {
            // Keep the original failure even if closing the run also fails
            let _ = tracker.end_run(&run_id, RunStatus::Failed);
            Err(e)
        }
    }
}

fn run_stages<B: TrackingBackend>(
    config: &PipelineConfig,
    tracker: &mut ExperimentTracker<B>,
    run_id: &str,
) -> Result<PipelineOutcome> {
    // Stage 1: preprocess
    let splits = preprocess_stage(config)?;
    tracker.log_param(run_id, "scaler", "standard")?;
    tracker.log_param(run_id, "seed", &config.seed.to_string())?;
    tracker.log_param(run_id, "num_features", &splits.feature_names.len().to_string())?;
    tracker.log_metric(run_id, "train_size", splits.train.len() as f64, 0)?;
    tracker.log_metric(run_id, "val_size", splits.val.len() as f64, 0)?;
    tracker.log_metric(run_id, "test_size", splits.test.len() as f64, 0)?;
    tracker.log_metric(run_id, "label_1_count", splits.train.positives() as f64, 0)?;
    tracker.log_artifact(run_id, &config.splits_path().display().to_string())?;

    // Stage 2: train
    let (_bundle, selection) = train_stage(config)?;
    tracker.log_param(run_id, "scoring", config.selection.scoring.as_str())?;
    tracker.log_param(run_id, "selected_family", selection.family.as_str())?;
    for result in &selection.leaderboard {
        tracker.log_metric(
            run_id,
            &format!("cv_{}", result.family),
            result.cv_score,
            0,
        )?;
    }
    for (key, value) in &selection.params {
        tracker.log_param(run_id, &format!("best_{key}"), &value.to_string())?;
    }
    tracker.log_metric(run_id, "cv_score", selection.cv_score, 0)?;
    tracker.log_artifact(run_id, &config.bundle_dir().display().to_string())?;

    // Stage 3: evaluate
    let (report, artifacts) = evaluate_stage(config)?;
    tracker.log_param(run_id, "threshold_used", &report.threshold.to_string())?;
    tracker.log_param(run_id, "threshold_type", &report.threshold_source)?;
    tracker.log_param(run_id, "threshold_cost_value", &report.cost_threshold.to_string())?;
    tracker.log_metric(run_id, "test_accuracy", report.accuracy, 0)?;
    tracker.log_metric(run_id, "test_f1_score", report.f1, 0)?;
    tracker.log_metric(run_id, "test_roc_auc", report.roc_auc, 0)?;
    tracker.log_metric(run_id, "test_samples", report.n_samples as f64, 0)?;
    tracker.log_metric(
        run_id,
        "estimated_misclassification_cost",
        report.estimated_cost,
        0,
    )?;
    for path in artifacts.all() {
        tracker.log_artifact(run_id, &path.display().to_string())?;
    }

    Ok(PipelineOutcome {
        run_id: String::new(),
        run_name: String::new(),
        splits_path: config.splits_path(),
        bundle_dir: config.bundle_dir(),
        selection,
        report,
        artifacts,
    })
}
