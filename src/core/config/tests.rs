use super::data::{path_display, Config};
use super::io::ConfigError;
use super::orchestrator::ConfigStore;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_store_detects_external_updates() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let store = ConfigStore::new(config_path.clone());

    store
        .update(|config| {
            config.api_base_url = Some("http://first.test/api".to_string());
            Ok(())
        })
        .expect("update failed");

    let persisted = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(
        persisted.api_base_url.as_deref(),
        Some("http://first.test/api")
    );

    std::thread::sleep(Duration::from_millis(1100));

    let external = Config {
        api_base_url: Some("http://second.test/api".to_string()),
        ..Default::default()
    };
    external
        .save_to_path(&config_path)
        .expect("external save failed");

    let reloaded = store.load().expect("reload failed");
    assert_eq!(reloaded.api_base_url(), "http://second.test/api");
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        sync_debounce_ms: Some(250),
        enrich: Some(false),
        data_dir: Some(PathBuf::from("/srv/sheets")),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.sync_debounce(), Duration::from_millis(250));
    assert!(!loaded.enrich_enabled());
    assert_eq!(loaded.data_dir(), Some(PathBuf::from("/srv/sheets").as_path()));

    let mut config = loaded;
    config.enrich = None;
    config
        .save_to_path(&config_path)
        .expect("Failed to save modified config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load modified config");
    assert!(loaded.enrich_enabled());
    assert_eq!(loaded.sync_debounce_ms, Some(250));
}

#[test]
fn invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "sync_debounce_ms = \"soon\"").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn failed_mutator_leaves_file_untouched() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let store = ConfigStore::new(config_path.clone());

    let result: Result<(), _> = store.update(|config| {
        config.max_suggestions = Some(3);
        Err("nope".into())
    });
    assert!(result.is_err());
    assert!(!config_path.exists());
    assert_eq!(store.load().unwrap().max_suggestions, None);
}

#[cfg(unix)]
#[test]
fn path_display_abbreviates_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".local/share/sheetkeep");
        assert_eq!(path_display(&path), "~/.local/share/sheetkeep");
    }
}
