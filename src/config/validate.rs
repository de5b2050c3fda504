//! Configuration validation
//!
//! Field-by-field checks with actionable messages, run before any
//! filesystem side effect.

use super::schema::FiarConfig;
use crate::error::{FiarError, Result};

fn invalid(field: &str, message: String, suggestion: &str) -> FiarError {
    FiarError::ConfigValue {
        field: field.to_string(),
        message,
        suggestion: suggestion.to_string(),
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &FiarConfig) -> Result<()> {
    for key in config.workspaces.keys() {
        if key.parse::<crate::registry::Stage>().is_err() {
            return Err(invalid(
                "workspaces",
                format!("unknown environment key '{key}'"),
                "Use dev, test, or prod",
            ));
        }
    }

    let p = &config.pipeline;
    if !(p.holdout > 0.0 && p.holdout < 1.0) {
        return Err(invalid(
            "pipeline.holdout",
            format!("{} is outside (0, 1)", p.holdout),
            "Use a fraction like 0.3",
        ));
    }
    if p.selection.n_iter == 0 {
        return Err(invalid(
            "pipeline.selection.n_iter",
            "0 search iterations".to_string(),
            "Use at least 1 iteration",
        ));
    }
    if p.selection.cv_folds < 2 {
        return Err(invalid(
            "pipeline.selection.cv_folds",
            format!("{} folds", p.selection.cv_folds),
            "Cross-validation needs at least 2 folds",
        ));
    }

    let e = &p.evaluation;
    if !(e.beta > 0.0) {
        return Err(invalid(
            "pipeline.evaluation.beta",
            format!("{} is not positive", e.beta),
            "Use 1.0 for F1 or 2.0 for F2",
        ));
    }
    if !(e.grid.step > 0.0) {
        return Err(invalid(
            "pipeline.evaluation.grid.step",
            format!("{} is not positive", e.grid.step),
            "Use a small positive step like 0.01",
        ));
    }
    if e.grid.start >= e.grid.stop {
        return Err(invalid(
            "pipeline.evaluation.grid",
            format!("start {} is not below stop {}", e.grid.start, e.grid.stop),
            "Use an ascending range like 0.2..0.8",
        ));
    }
    if e.grid.start < 0.0 || e.grid.stop > 1.0 {
        return Err(invalid(
            "pipeline.evaluation.grid",
            format!("[{}, {}) is outside [0, 1]", e.grid.start, e.grid.stop),
            "Thresholds are probabilities",
        ));
    }
    if e.cost_fp < 0.0 || e.cost_fn < 0.0 {
        return Err(invalid(
            "pipeline.evaluation",
            "negative misclassification cost".to_string(),
            "Unit costs must be non-negative",
        ));
    }

    if config.serve.address.parse::<std::net::SocketAddr>().is_err() {
        return Err(invalid(
            "serve.address",
            format!("'{}' is not a socket address", config.serve.address),
            "Use host:port, e.g. 127.0.0.1:8080",
        ));
    }
    if let Some(t) = config.serve.threshold {
        if !(t > 0.0 && t < 1.0) {
            return Err(invalid(
                "serve.threshold",
                format!("{t} is outside (0, 1)"),
                "Thresholds are probabilities",
            ));
        }
    }

    Ok(())
}
