//! Pipeline command implementation

use std::collections::HashMap;

use crate::cli::args::PipelineArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::pipeline::run_pipeline;
use crate::registry::ModelRegistry;
use crate::tracking::storage::JsonFileBackend;
use crate::tracking::ExperimentTracker;

pub fn run_pipeline_command(args: PipelineArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let runs_dir = config
        .runs_dir(args.env)
        .map_err(|e| format!("Config error: {e}"))?;

    let mut tracker =
        ExperimentTracker::new("credit-default", JsonFileBackend::new(runs_dir));
    tracker.add_tag("env", args.env.as_str());

    log(level, LogLevel::Normal, "Running pipeline: preprocess -> train -> evaluate");
    let outcome =
        run_pipeline(&config.pipeline, &mut tracker).map_err(|e| format!("Pipeline error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("Pipeline run {} ({}) complete", outcome.run_name, outcome.run_id),
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Selected {} (cv {:.4}); test F1 {:.4}, ROC AUC {:.4}, threshold {:.2}",
            outcome.selection.family,
            outcome.selection.cv_score,
            outcome.report.f1,
            outcome.report.roc_auc,
            outcome.report.threshold
        ),
    );

    if args.register {
        let models_dir = config
            .models_dir(args.env)
            .map_err(|e| format!("Config error: {e}"))?;
        let registry = ModelRegistry::new(models_dir);
        let mut tags = HashMap::new();
        tags.insert("stage".to_string(), args.env.as_str().to_string());
        tags.insert("run".to_string(), outcome.run_name.clone());
        let record = registry
            .register_model(
                &config.pipeline.model_name,
                None,
                &outcome.bundle_dir,
                args.env,
                "Registered by pipeline run",
                tags,
            )
            .map_err(|e| format!("Registration error: {e}"))?;
        log(
            level,
            LogLevel::Normal,
            &format!("Registered model {} v{} in {}", record.name, record.version, args.env),
        );
    }
    Ok(())
}
