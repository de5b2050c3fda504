//! Validate command implementation

use crate::cli::args::ValidateArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::registry::Stage;

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("{} is valid", args.config.display()),
    );
    for env in [Stage::Dev, Stage::Test, Stage::Prod] {
        match config.workspace_dir(env) {
            Ok(dir) => log(
                level,
                LogLevel::Verbose,
                &format!("  {env}: {}", dir.display()),
            ),
            Err(_) => log(level, LogLevel::Verbose, &format!("  {env}: not configured")),
        }
    }
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  pipeline: {} iterations, {} folds, scoring {}",
            config.pipeline.selection.n_iter,
            config.pipeline.selection.cv_folds,
            config.pipeline.selection.scoring.as_str()
        ),
    );
    Ok(())
}
