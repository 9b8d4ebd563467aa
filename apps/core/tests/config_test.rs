use std::path::PathBuf;

use tcode_helper_core::config::{self, Config, ConfigError};

#[test]
fn accepts_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.hotkey, "Shift+F12");
    assert_eq!(cfg.catalog_path, PathBuf::from("tcodes.json"));
    assert_eq!(cfg.icon_path, PathBuf::from("logo.png"));
    assert!(cfg.config_path.to_string_lossy().contains("tcode-helper"));
    assert!(config::validate(&cfg).is_ok());
}

#[test]
fn rejects_empty_catalog_path() {
    let cfg = Config {
        catalog_path: PathBuf::new(),
        ..Default::default()
    };
    assert!(matches!(config::validate(&cfg), Err(ConfigError::Invalid(_))));
}

#[test]
fn rejects_invalid_hotkey() {
    let cfg = Config {
        hotkey: "F12".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tcode-helper.toml");

    let cfg = config::load(Some(&path)).unwrap();

    assert_eq!(cfg.hotkey, "Shift+F12");
    assert_eq!(cfg.config_path, path);
}

#[test]
fn partial_file_is_merged_with_defaults_and_canonicalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tcode-helper.toml");
    std::fs::write(&path, "hotkey = \"shift + ctrl + t\"\ncatalog_path = \"codes.json\"\n").unwrap();

    let cfg = config::load(Some(&path)).unwrap();

    assert_eq!(cfg.hotkey, "Ctrl+Shift+T");
    assert_eq!(cfg.catalog_path, PathBuf::from("codes.json"));
    assert_eq!(cfg.icon_path, PathBuf::from("logo.png"));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tcode-helper.toml");
    std::fs::write(&path, "hotkey = [").unwrap();

    assert!(matches!(
        config::load(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        hotkey: "Ctrl+Alt+K".to_string(),
        log_level: "debug".to_string(),
        config_path: dir.path().join("nested").join("tcode-helper.toml"),
        ..Default::default()
    };

    config::save(&cfg).unwrap();
    let loaded = config::load(Some(&cfg.config_path)).unwrap();

    assert_eq!(loaded, cfg);
}
