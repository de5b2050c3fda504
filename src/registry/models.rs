//! Versioned model registry
//!
//! One directory per model version under `<root>/<name>/<version>/`, with
//! a JSON index per model. Versions are numeric strings; the latest
//! version is the numeric maximum, ignoring anything non-numeric.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::staging::Stage;
use super::{RegistryError, Result};

/// Metadata for one registered model version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub name: String,
    pub version: String,
    pub stage: Stage,
    pub description: String,
    pub tags: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// File-backed model registry rooted at one workspace directory.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    root: PathBuf,
}

impl ModelRegistry {
    /// Create a registry rooted at `root` (created lazily).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Registry root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one version's bundle files.
    pub fn bundle_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(version)
    }

    fn index_path(&self, name: &str) -> PathBuf {
        self.root.join(name).join("index.json")
    }

    fn read_index(&self, name: &str) -> Result<Vec<ModelRecord>> {
        let path = self.index_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| RegistryError::io(format!("reading {}", path.display()), e))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write_index(&self, name: &str, records: &[ModelRecord]) -> Result<()> {
        let path = self.index_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RegistryError::io(format!("creating {}", parent.display()), e))?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json)
            .map_err(|e| RegistryError::io(format!("writing {}", path.display()), e))
    }

    /// Register a bundle directory as a model version.
    ///
    /// With no explicit version the next numeric version is assigned
    /// (starting at "1"). Registering an existing (name, version) fails.
    pub fn register_model(
        &self,
        name: &str,
        version: Option<&str>,
        bundle_dir: &Path,
        stage: Stage,
        description: &str,
        tags: HashMap<String, String>,
    ) -> Result<ModelRecord> {
        if !bundle_dir.is_dir() {
            return Err(RegistryError::MissingBundle {
                path: bundle_dir.to_path_buf(),
            });
        }

        let mut records = self.read_index(name)?;
        let version = match version {
            Some(v) => v.to_string(),
            None => match numeric_max(&records) {
                Some(latest) => (latest + 1).to_string(),
                None => "1".to_string(),
            },
        };

        if records.iter().any(|r| r.version == version) {
            return Err(RegistryError::AlreadyExists {
                name: name.to_string(),
                version,
            });
        }

        let target = self.bundle_dir(name, &version);
        copy_dir_files(bundle_dir, &target)?;

        let record = ModelRecord {
            name: name.to_string(),
            version: version.clone(),
            stage,
            description: description.to_string(),
            tags,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        self.write_index(name, &records)?;
        Ok(record)
    }

    /// Highest numeric version of a model. Non-numeric versions are
    /// ignored; no versions at all is an error.
    pub fn latest_version(&self, name: &str) -> Result<String> {
        let records = self.read_index(name)?;
        numeric_max(&records)
            .map(|v| v.to_string())
            .ok_or_else(|| RegistryError::NoVersions {
                name: name.to_string(),
            })
    }

    /// Look up one version's record.
    pub fn get(&self, name: &str, version: &str) -> Result<ModelRecord> {
        self.read_index(name)?
            .into_iter()
            .find(|r| r.version == version)
            .ok_or_else(|| RegistryError::ModelNotFound {
                name: name.to_string(),
                version: version.to_string(),
            })
    }

    /// All versions of a model, oldest registration first.
    pub fn list(&self, name: &str) -> Result<Vec<ModelRecord>> {
        let mut records = self.read_index(name)?;
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

fn numeric_max(records: &[ModelRecord]) -> Option<u64> {
    records
        .iter()
        .filter_map(|r| r.version.parse::<u64>().ok())
        .max()
}

/// Copy the regular files of `src` into `dst` (bundles are flat).
fn copy_dir_files(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .map_err(|e| RegistryError::io(format!("creating {}", dst.display()), e))?;
    let entries = fs::read_dir(src)
        .map_err(|e| RegistryError::io(format!("reading {}", src.display()), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| RegistryError::io("reading bundle entry", e))?;
        let path = entry.path();
        if path.is_file() {
            let target = dst.join(entry.file_name());
            fs::copy(&path, &target).map_err(|e| {
                RegistryError::io(
                    format!("copying {} to {}", path.display(), target.display()),
                    e,
                )
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(dir: &Path) -> PathBuf {
        let bundle = dir.join("bundle");
        fs::create_dir_all(&bundle).expect("mkdir");
        fs::write(bundle.join("model.json"), "{}").expect("write");
        fs::write(bundle.join("deploy.json"), "{}").expect("write");
        bundle
    }

    #[test]
    fn test_register_assigns_sequential_versions() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(tmp.path().join("models"));
        let bundle = bundle(tmp.path());

        let first = registry
            .register_model("m", None, &bundle, Stage::Dev, "", HashMap::new())
            .expect("register");
        let second = registry
            .register_model("m", None, &bundle, Stage::Dev, "", HashMap::new())
            .expect("register");
        assert_eq!(first.version, "1");
        assert_eq!(second.version, "2");
        assert!(registry.bundle_dir("m", "2").join("model.json").exists());
    }

    #[test]
    fn test_register_duplicate_version_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(tmp.path().join("models"));
        let bundle = bundle(tmp.path());

        registry
            .register_model("m", Some("7"), &bundle, Stage::Dev, "", HashMap::new())
            .expect("register");
        let result =
            registry.register_model("m", Some("7"), &bundle, Stage::Dev, "", HashMap::new());
        assert!(matches!(result, Err(RegistryError::AlreadyExists { .. })));
    }

    #[test]
    fn test_register_missing_bundle_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(tmp.path().join("models"));
        let result = registry.register_model(
            "m",
            None,
            &tmp.path().join("nope"),
            Stage::Dev,
            "",
            HashMap::new(),
        );
        assert!(matches!(result, Err(RegistryError::MissingBundle { .. })));
    }

    #[test]
    fn test_latest_version_numeric_max_ignores_non_numeric() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(tmp.path().join("models"));
        let bundle = bundle(tmp.path());

        for v in ["2", "10", "experimental"] {
            registry
                .register_model("m", Some(v), &bundle, Stage::Dev, "", HashMap::new())
                .expect("register");
        }
        assert_eq!(registry.latest_version("m").expect("latest"), "10");
    }

    #[test]
    fn test_latest_version_none_is_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(tmp.path().join("models"));
        assert!(matches!(
            registry.latest_version("ghost"),
            Err(RegistryError::NoVersions { .. })
        ));
    }

    #[test]
    fn test_get_and_list() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(tmp.path().join("models"));
        let bundle = bundle(tmp.path());

        let mut tags = HashMap::new();
        tags.insert("stage".to_string(), "dev".to_string());
        registry
            .register_model("m", None, &bundle, Stage::Dev, "first", tags)
            .expect("register");
        registry
            .register_model("m", None, &bundle, Stage::Dev, "second", HashMap::new())
            .expect("register");

        let record = registry.get("m", "1").expect("get");
        assert_eq!(record.description, "first");
        assert_eq!(record.tags.get("stage"), Some(&"dev".to_string()));

        let all = registry.list("m").expect("list");
        assert_eq!(all.len(), 2);

        assert!(matches!(
            registry.get("m", "99"),
            Err(RegistryError::ModelNotFound { .. })
        ));
    }
}
