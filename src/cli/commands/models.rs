//! Models command implementation

use crate::cli::args::ModelsArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::registry::ModelRegistry;

pub fn run_models(args: ModelsArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let models_dir = config
        .models_dir(args.env)
        .map_err(|e| format!("Config error: {e}"))?;

    let name = args.name.unwrap_or_else(|| config.pipeline.model_name.clone());
    let registry = ModelRegistry::new(models_dir);
    let records = registry.list(&name).map_err(|e| format!("Registry error: {e}"))?;

    if records.is_empty() {
        log(
            level,
            LogLevel::Normal,
            &format!("No registered versions of {name} in {}", args.env),
        );
        return Ok(());
    }

    log(level, LogLevel::Normal, &format!("{name} in {}:", args.env));
    for record in &records {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "  v{} [{}] {} ({})",
                record.version,
                record.stage,
                record.created_at.format("%Y-%m-%d %H:%M:%S"),
                record.description
            ),
        );
    }
    let latest = registry.latest_version(&name).map_err(|e| format!("Registry error: {e}"))?;
    log(level, LogLevel::Verbose, &format!("  latest: v{latest}"));
    Ok(())
}
