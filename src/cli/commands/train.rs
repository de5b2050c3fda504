//! Train command implementation

use crate::cli::args::StageArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::pipeline::train_stage;

pub fn run_train(args: StageArgs, level: LogLevel) -> Result<(), String> {
    let mut config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    if let Some(output) = args.output_dir {
        config.pipeline.output_dir = output;
    }
    if let Some(seed) = args.seed {
        config.pipeline.seed = seed;
    }

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Selecting model ({} iterations, {} folds, scoring {})",
            config.pipeline.selection.n_iter,
            config.pipeline.selection.cv_folds,
            config.pipeline.selection.scoring.as_str()
        ),
    );

    let (_, selection) = train_stage(&config.pipeline).map_err(|e| format!("Training error: {e}"))?;

    for result in &selection.leaderboard {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "  {}: cv {} = {:.4} ({} trials, {} failed)",
                result.family,
                config.pipeline.selection.scoring.as_str(),
                result.cv_score,
                result.n_trials,
                result.n_failed
            ),
        );
    }
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Selected {} with cv score {:.4}; bundle at {}",
            selection.family,
            selection.cv_score,
            config.pipeline.bundle_dir().display()
        ),
    );
    Ok(())
}
