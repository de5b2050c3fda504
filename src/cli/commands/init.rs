//! Init command implementation

use crate::cli::args::EnvArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;

pub fn run_init(args: EnvArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    let workspace = config
        .workspace_dir(args.env)
        .map_err(|e| format!("Config error: {e}"))?
        .to_path_buf();

    for sub in ["assets", "models", "runs"] {
        let dir = workspace.join(sub);
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;
        log(level, LogLevel::Verbose, &format!("  created {}", dir.display()));
    }

    log(
        level,
        LogLevel::Normal,
        &format!("Initialized {} workspace at {}", args.env, workspace.display()),
    );
    Ok(())
}
