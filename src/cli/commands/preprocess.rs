//! Preprocess command implementation

use crate::cli::args::PreprocessArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::pipeline::preprocess_stage;

pub fn run_preprocess(args: PreprocessArgs, level: LogLevel) -> Result<(), String> {
    let mut config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    if let Some(input) = args.input_data {
        config.pipeline.input_data = input;
    }
    if let Some(output) = args.output_dir {
        config.pipeline.output_dir = output;
    }

    log(
        level,
        LogLevel::Normal,
        &format!("Preprocessing {}", config.pipeline.input_data.display()),
    );

    let splits = preprocess_stage(&config.pipeline).map_err(|e| format!("Preprocess error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Splits written to {} (train {}, val {}, test {})",
            config.pipeline.splits_path().display(),
            splits.train.len(),
            splits.val.len(),
            splits.test.len()
        ),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  features: {}", splits.feature_names.len()),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  train positives: {}", splits.train.positives()),
    );
    Ok(())
}
