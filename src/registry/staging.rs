//! Environment stages and promotion
//!
//! Models progress dev -> test -> prod, one step at a time. Promotion
//! copies the bundle from the source environment's registry into the
//! target's at the same version, stamping stage and source tags.

use serde::{Deserialize, Serialize};

use super::models::ModelRegistry;
use super::{ModelRecord, RegistryError, Result};

/// Deployment environment / lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Dev,
    Test,
    Prod,
}

impl Stage {
    /// Numeric ordering for stage progression.
    fn ordinal(self) -> u8 {
        match self {
            Stage::Dev => 0,
            Stage::Test => 1,
            Stage::Prod => 2,
        }
    }

    /// The next stage up, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Dev => Some(Stage::Test),
            Stage::Test => Some(Stage::Prod),
            Stage::Prod => None,
        }
    }

    /// Lowercase name, also the workspace key in fiar.yaml.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Dev => "dev",
            Stage::Test => "test",
            Stage::Prod => "prod",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Stage::Dev),
            "test" => Ok(Stage::Test),
            "prod" => Ok(Stage::Prod),
            other => Err(format!("unknown environment: {other} (expected dev, test, or prod)")),
        }
    }
}

/// Promote a model version from one environment registry to the next.
///
/// `version` defaults to the source's highest registered version. The
/// target stage must be exactly one step above the record's current stage;
/// skipping a stage is rejected.
pub fn promote(
    source: &ModelRegistry,
    target: &ModelRegistry,
    name: &str,
    version: Option<&str>,
    to: Stage,
) -> Result<ModelRecord> {
    let version = match version {
        Some(v) => v.to_string(),
        None => source.latest_version(name)?,
    };
    let record = source.get(name, &version)?;

    if to.ordinal() != record.stage.ordinal() + 1 {
        return Err(RegistryError::InvalidTransition {
            name: name.to_string(),
            version,
            from: record.stage,
            to,
        });
    }

    let bundle_dir = source.bundle_dir(name, &version);
    let mut tags = record.tags.clone();
    tags.insert("stage".to_string(), to.as_str().to_string());
    tags.insert("source".to_string(), record.stage.as_str().to_string());

    target.register_model(
        name,
        Some(&version),
        &bundle_dir,
        to,
        &format!("Promoted from {} environment", record.stage),
        tags,
    )
}
