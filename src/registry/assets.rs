//! Versioned data assets
//!
//! Registration computes the file's SHA-256; if any existing version of
//! the named asset has the same hash, the upload is skipped and the
//! existing record returned. New versions are stamped `v<UTC timestamp>`.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{RegistryError, Result};

/// Metadata for one registered asset version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    pub version: String,
    pub sha256: String,
    pub description: String,
    pub tags: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    /// Stored copy of the file inside the workspace.
    pub path: PathBuf,
}

/// Outcome of an asset registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// A new version was stored.
    Registered(AssetRecord),
    /// Identical content was already registered; nothing was written.
    AlreadyRegistered(AssetRecord),
}

impl RegisterOutcome {
    /// The record either way.
    pub fn record(&self) -> &AssetRecord {
        match self {
            RegisterOutcome::Registered(r) | RegisterOutcome::AlreadyRegistered(r) => r,
        }
    }
}

/// Streaming SHA-256 of a file, hex-encoded.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)
        .map_err(|e| RegistryError::io(format!("opening {}", path.display()), e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| RegistryError::io(format!("reading {}", path.display()), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// File-backed asset store rooted at one workspace directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a store rooted at `root` (created lazily).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn index_path(&self, name: &str) -> PathBuf {
        self.root.join(name).join("index.json")
    }

    fn read_index(&self, name: &str) -> Result<Vec<AssetRecord>> {
        let path = self.index_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| RegistryError::io(format!("reading {}", path.display()), e))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write_index(&self, name: &str, records: &[AssetRecord]) -> Result<()> {
        let path = self.index_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RegistryError::io(format!("creating {}", parent.display()), e))?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json)
            .map_err(|e| RegistryError::io(format!("writing {}", path.display()), e))
    }

    /// Register a file as a new asset version unless identical content
    /// already exists.
    pub fn register(
        &self,
        name: &str,
        file: &Path,
        description: &str,
        mut tags: HashMap<String, String>,
    ) -> Result<RegisterOutcome> {
        if !file.is_file() {
            return Err(RegistryError::MissingAsset {
                path: file.to_path_buf(),
            });
        }

        let hash = sha256_file(file)?;
        let mut records = self.read_index(name)?;
        if let Some(existing) = records.iter().find(|r| r.sha256 == hash) {
            return Ok(RegisterOutcome::AlreadyRegistered(existing.clone()));
        }

        let base = format!("v{}", Utc::now().format("%Y%m%d%H%M%S"));
        let mut version = base.clone();
        let mut suffix = 2;
        while records.iter().any(|r| r.version == version) {
            version = format!("{base}-{suffix}");
            suffix += 1;
        }
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data".to_string());
        let stored_dir = self.root.join(name).join(&version);
        fs::create_dir_all(&stored_dir)
            .map_err(|e| RegistryError::io(format!("creating {}", stored_dir.display()), e))?;
        let stored = stored_dir.join(&file_name);
        fs::copy(file, &stored).map_err(|e| {
            RegistryError::io(
                format!("copying {} to {}", file.display(), stored.display()),
                e,
            )
        })?;

        tags.insert("hash".to_string(), hash.clone());
        let record = AssetRecord {
            name: name.to_string(),
            version,
            sha256: hash,
            description: description.to_string(),
            tags,
            created_at: Utc::now(),
            path: stored,
        };
        records.push(record.clone());
        self.write_index(name, &records)?;
        Ok(RegisterOutcome::Registered(record))
    }

    /// All versions of an asset, oldest first.
    pub fn list(&self, name: &str) -> Result<Vec<AssetRecord>> {
        let mut records = self.read_index(name)?;
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("clients.csv");
        fs::write(&path, content).expect("write");
        path
    }

    #[test]
    fn test_sha256_known_value() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = data_file(tmp.path(), "abc");
        // sha256("abc")
        assert_eq!(
            sha256_file(&path).expect("hash"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_register_stores_copy_and_hash_tag() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(tmp.path().join("assets"));
        let file = data_file(tmp.path(), "a,b\n1,2\n");

        let outcome = store
            .register("credit_default_data", &file, "raw table", HashMap::new())
            .expect("register");
        let record = match outcome {
            RegisterOutcome::Registered(r) => r,
            other => panic!("expected Registered, got {other:?}"),
        };
        assert!(record.version.starts_with('v'));
        assert!(record.path.exists());
        assert_eq!(record.tags.get("hash"), Some(&record.sha256));
    }

    #[test]
    fn test_register_identical_content_is_idempotent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(tmp.path().join("assets"));
        let file = data_file(tmp.path(), "a,b\n1,2\n");

        let first = store
            .register("d", &file, "", HashMap::new())
            .expect("register");
        let second = store
            .register("d", &file, "", HashMap::new())
            .expect("register");

        assert!(matches!(first, RegisterOutcome::Registered(_)));
        match &second {
            RegisterOutcome::AlreadyRegistered(r) => {
                assert_eq!(r.version, first.record().version);
            }
            other => panic!("expected AlreadyRegistered, got {other:?}"),
        }
        assert_eq!(store.list("d").expect("list").len(), 1);
    }

    #[test]
    fn test_register_changed_content_creates_new_version() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(tmp.path().join("assets"));

        let file = data_file(tmp.path(), "v1");
        store.register("d", &file, "", HashMap::new()).expect("register");

        fs::write(&file, "v2").expect("write");
        let outcome = store.register("d", &file, "", HashMap::new()).expect("register");
        assert!(matches!(outcome, RegisterOutcome::Registered(_)));
        assert_eq!(store.list("d").expect("list").len(), 2);
    }

    #[test]
    fn test_register_missing_file_is_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(tmp.path().join("assets"));
        let result = store.register("d", &tmp.path().join("nope.csv"), "", HashMap::new());
        assert!(matches!(result, Err(RegistryError::MissingAsset { .. })));
    }
}
