#![allow(non_snake_case)]

use super::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn create_bundle(temp_dir: &TempDir, name: &str, framework: Value) -> std::path::PathBuf {
    let dir = temp_dir.path().join(name);
    fs::create_dir(&dir).unwrap();
    let manifest = json!({ "name": name, "version": "1.2.3", "nodecg": framework });
    fs::write(dir.join(MANIFEST_FILE), manifest.to_string()).unwrap();
    dir
}

#[test]
fn BundleLoader___load___minimal_bundle___is_empty_but_valid() {
    let temp_dir = TempDir::new().unwrap();
    let dir = create_bundle(&temp_dir, "minimal", json!({ "compatibleRange": "^1.0.0" }));

    let bundle = BundleLoader::default().load(&dir, None).unwrap();

    assert_eq!(bundle.name(), "minimal");
    assert_eq!(bundle.version(), Some("1.2.3"));
    assert_eq!(bundle.dir(), fs::canonicalize(&dir).unwrap());
    assert_eq!(bundle.config(), &json!({}));
    assert!(bundle.dashboard().panels().is_empty());
    assert!(bundle.graphics().is_empty());
    assert!(bundle.sound_cues().is_empty());
    assert!(bundle.upload_categories().is_empty());
    assert!(bundle.asset_categories().is_empty());
    assert!(!bundle.has_extension());
}

#[test]
fn BundleLoader___load___keeps_raw_manifest_text() {
    let temp_dir = TempDir::new().unwrap();
    let dir = create_bundle(&temp_dir, "raw", json!({ "compatibleRange": "*" }));
    let text = "{\n  \"name\": \"raw\",\n  \"version\": \"1.0.0\",\n  \"nodecg\": { \"compatibleRange\": \"*\" }\n}\n";
    fs::write(dir.join(MANIFEST_FILE), text).unwrap();

    let bundle = BundleLoader::default().load(&dir, None).unwrap();

    assert_eq!(bundle.raw_manifest(), text);
}

#[test]
fn BundleLoader___load___missing_directory___returns_manifest_missing() {
    let temp_dir = TempDir::new().unwrap();

    let err = BundleLoader::default()
        .load(temp_dir.path().join("nope"), None)
        .unwrap_err();

    assert!(matches!(err, BundleError::ManifestMissing { .. }));
}

#[test]
fn BundleLoader___load___relative_path___compares_resolved_folder_name() {
    let temp_dir = TempDir::new().unwrap();
    let dir = create_bundle(&temp_dir, "relative", json!({ "compatibleRange": "*" }));

    let bundle = BundleLoader::default().load(dir.join("."), None).unwrap();

    assert_eq!(bundle.name(), "relative");
}

#[test]
fn BundleLoader___load___custom_options___are_used() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("custom");
    fs::create_dir(&dir).unwrap();
    let manifest = json!({
        "name": "custom",
        "version": "1.0.0",
        "showcall": { "compatibleRange": "*" }
    });
    fs::write(dir.join(MANIFEST_FILE), manifest.to_string()).unwrap();
    let loader = BundleLoader::new(ParseOptions::default().with_framework_key("showcall"));

    let bundle = loader.load(&dir, None).unwrap();

    assert_eq!(loader.options().framework_key, "showcall");
    assert_eq!(bundle.name(), "custom");
    assert_eq!(bundle.framework()["compatibleRange"], "*");
}

#[test]
fn parse_bundle___config_file___is_resolved() {
    let temp_dir = TempDir::new().unwrap();
    let dir = create_bundle(&temp_dir, "configured", json!({ "compatibleRange": "*" }));
    let config_path = temp_dir.path().join("configured.json");
    fs::write(&config_path, r#"{"greeting": "hello"}"#).unwrap();

    let bundle = parse_bundle(&dir, Some(config_path.as_path())).unwrap();

    assert_eq!(bundle.config(), &json!({ "greeting": "hello" }));
}

#[test]
fn parse_bundle___missing_config_file___returns_config_file_missing() {
    let temp_dir = TempDir::new().unwrap();
    let dir = create_bundle(&temp_dir, "configured", json!({ "compatibleRange": "*" }));

    let err = parse_bundle(&dir, Some(temp_dir.path().join("nope.json").as_path())).unwrap_err();

    assert!(matches!(err, BundleError::ConfigFileMissing { .. }));
}
