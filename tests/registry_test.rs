//! Registry integration tests
//!
//! Data asset dedup, model version indexing, and stage transitions across
//! separate workspace directories.

use std::collections::HashMap;
use std::path::Path;

use fiar::registry::{
    promote, AssetStore, ModelRegistry, RegisterOutcome, RegistryError, Stage,
};

fn write_bundle(dir: &Path) {
    std::fs::create_dir_all(dir).expect("mkdir");
    for file in ["model.json", "scaler.json", "deploy.json"] {
        std::fs::write(dir.join(file), "{}").expect("write");
    }
}

#[test]
fn test_asset_upload_dedup_across_sessions() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let data = tmp.path().join("clients.csv");
    std::fs::write(&data, "a,b\n1,2\n").expect("write");

    // A second store over the same directory sees the first registration
    let first = AssetStore::new(tmp.path().join("assets"))
        .register("credit_default_data", &data, "raw", HashMap::new())
        .expect("register");
    let second = AssetStore::new(tmp.path().join("assets"))
        .register("credit_default_data", &data, "raw", HashMap::new())
        .expect("register");

    assert!(matches!(first, RegisterOutcome::Registered(_)));
    assert!(matches!(second, RegisterOutcome::AlreadyRegistered(_)));
    assert_eq!(second.record().sha256, first.record().sha256);
}

#[test]
fn test_model_version_index_survives_reopen() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let bundle = tmp.path().join("bundle");
    write_bundle(&bundle);

    {
        let registry = ModelRegistry::new(tmp.path().join("models"));
        registry
            .register_model("m", None, &bundle, Stage::Dev, "first", HashMap::new())
            .expect("register");
        registry
            .register_model("m", None, &bundle, Stage::Dev, "second", HashMap::new())
            .expect("register");
    }

    let reopened = ModelRegistry::new(tmp.path().join("models"));
    assert_eq!(reopened.latest_version("m").expect("latest"), "2");
    assert_eq!(reopened.list("m").expect("list").len(), 2);
    assert_eq!(reopened.get("m", "1").expect("get").description, "first");
}

#[test]
fn test_promotion_requires_existing_version() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dev = ModelRegistry::new(tmp.path().join("dev/models"));
    let test = ModelRegistry::new(tmp.path().join("test/models"));

    let bundle = tmp.path().join("bundle");
    write_bundle(&bundle);
    dev.register_model("m", Some("5"), &bundle, Stage::Dev, "", HashMap::new())
        .expect("register");

    let result = promote(&dev, &test, "m", Some("99"), Stage::Test);
    assert!(matches!(result, Err(RegistryError::ModelNotFound { .. })));

    let promoted = promote(&dev, &test, "m", Some("5"), Stage::Test).expect("promote");
    assert_eq!(promoted.version, "5");
    assert!(test.bundle_dir("m", "5").join("model.json").exists());
}

#[test]
fn test_promotion_twice_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dev = ModelRegistry::new(tmp.path().join("dev/models"));
    let test = ModelRegistry::new(tmp.path().join("test/models"));

    let bundle = tmp.path().join("bundle");
    write_bundle(&bundle);
    dev.register_model("m", None, &bundle, Stage::Dev, "", HashMap::new())
        .expect("register");

    promote(&dev, &test, "m", None, Stage::Test).expect("promote");
    let again = promote(&dev, &test, "m", None, Stage::Test);
    assert!(matches!(again, Err(RegistryError::AlreadyExists { .. })));
}

#[test]
fn test_promoted_record_is_not_promotable_past_prod() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dev = ModelRegistry::new(tmp.path().join("dev/models"));
    let test = ModelRegistry::new(tmp.path().join("test/models"));
    let prod = ModelRegistry::new(tmp.path().join("prod/models"));
    let beyond = ModelRegistry::new(tmp.path().join("beyond/models"));

    let bundle = tmp.path().join("bundle");
    write_bundle(&bundle);
    dev.register_model("m", None, &bundle, Stage::Dev, "", HashMap::new())
        .expect("register");
    promote(&dev, &test, "m", None, Stage::Test).expect("to test");
    promote(&test, &prod, "m", None, Stage::Prod).expect("to prod");

    // Prod has no next stage; every target is an invalid transition
    for target in [Stage::Dev, Stage::Test, Stage::Prod] {
        let result = promote(&prod, &beyond, "m", None, target);
        assert!(matches!(
            result,
            Err(RegistryError::InvalidTransition { .. })
        ));
    }
}
