//! Serve command implementation

use tracing_subscriber::EnvFilter;

use crate::cli::args::ServeArgs;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::load_config;
use crate::registry::ModelRegistry;
use crate::serve::{self, ServeConfig};

pub fn run_serve(args: ServeArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let models_dir = config
        .models_dir(args.env)
        .map_err(|e| format!("Config error: {e}"))?;

    let address = args
        .address
        .unwrap_or_else(|| config.serve.address.clone())
        .parse()
        .map_err(|e| format!("Invalid address: {e}"))?;

    let serve_config = ServeConfig {
        address,
        model_name: args
            .name
            .unwrap_or_else(|| config.pipeline.model_name.clone()),
        version: args.version,
        threshold_override: args.threshold.or(config.serve.threshold),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if level == LogLevel::Verbose {
                EnvFilter::new("debug")
            } else {
                EnvFilter::new("info")
            }
        }))
        .init();

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Serving {} from {} on {}",
            serve_config.model_name, args.env, serve_config.address
        ),
    );

    let registry = ModelRegistry::new(models_dir);
    let runtime = tokio::runtime::Runtime::new().map_err(|e| format!("Runtime error: {e}"))?;
    runtime
        .block_on(serve::run(serve_config, &registry))
        .map_err(|e| format!("Serve error: {e}"))
}
