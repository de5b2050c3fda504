//! Promote command implementation

use crate::cli::args::PromoteArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::registry::{promote, ModelRegistry};

pub fn run_promote(args: PromoteArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let source_dir = config
        .models_dir(args.from)
        .map_err(|e| format!("Config error: {e}"))?;
    let target_dir = config
        .models_dir(args.to)
        .map_err(|e| format!("Config error: {e}"))?;

    let name = args.name.unwrap_or_else(|| config.pipeline.model_name.clone());
    let source = ModelRegistry::new(source_dir);
    let target = ModelRegistry::new(target_dir);

    log(
        level,
        LogLevel::Normal,
        &format!("Promoting {name} from {} to {}", args.from, args.to),
    );

    let record = promote(&source, &target, &name, args.version.as_deref(), args.to)
        .map_err(|e| format!("Promotion error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("Promotion complete: {} v{} -> {}", record.name, record.version, args.to),
    );
    Ok(())
}
