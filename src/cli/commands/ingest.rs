//! Ingest command implementation

use crate::cli::args::IngestArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::registry::{AssetStore, RegisterOutcome};

pub fn run_ingest(args: IngestArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let assets_dir = config
        .assets_dir(args.env)
        .map_err(|e| format!("Config error: {e}"))?;

    let input = args.input.unwrap_or_else(|| config.pipeline.input_data.clone());
    log(
        level,
        LogLevel::Normal,
        &format!("Registering {} in {}", input.display(), args.env),
    );

    let store = AssetStore::new(assets_dir);
    let outcome = store
        .register(
            &args.name,
            &input,
            "Credit card default dataset uploaded for pipeline input",
            std::collections::HashMap::new(),
        )
        .map_err(|e| format!("Ingest error: {e}"))?;

    match outcome {
        RegisterOutcome::Registered(record) => {
            log(
                level,
                LogLevel::Normal,
                &format!("Registered data asset: {}:{}", record.name, record.version),
            );
            log(level, LogLevel::Verbose, &format!("  sha256: {}", record.sha256));
        }
        RegisterOutcome::AlreadyRegistered(record) => {
            log(
                level,
                LogLevel::Normal,
                &format!(
                    "Identical dataset already registered: {}:{} - skipping upload",
                    record.name, record.version
                ),
            );
        }
    }
    Ok(())
}
