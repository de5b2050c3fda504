//! Evaluate command implementation

use crate::cli::args::StageArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::pipeline::evaluate_stage;

pub fn run_evaluate(args: StageArgs, level: LogLevel) -> Result<(), String> {
    let mut config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    if let Some(output) = args.output_dir {
        config.pipeline.output_dir = output;
    }

    let (report, artifacts) =
        evaluate_stage(&config.pipeline).map_err(|e| format!("Evaluation error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Threshold {:.2} (F{}-optimal); cost-optimal alternative {:.2}",
            report.threshold, report.beta, report.cost_threshold
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Accuracy {:.4} | F1 {:.4} | ROC AUC {:.4} over {} samples",
            report.accuracy, report.f1, report.roc_auc, report.n_samples
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("Report written to {}", artifacts.report_json.display()),
    );
    for path in artifacts.all() {
        log(level, LogLevel::Verbose, &format!("  {}", path.display()));
    }
    Ok(())
}
