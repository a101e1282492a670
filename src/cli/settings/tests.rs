use super::*;
use crate::core::config::ConfigStore;
use tempfile::TempDir;

fn with_context<T>(roster: &Roster, run: impl FnOnce(&SetContext<'_>) -> T) -> (T, Config) {
    let temp_dir = TempDir::new().expect("temp dir");
    let store = ConfigStore::new(temp_dir.path().join("config.toml"));
    let config = store.load().expect("load config");
    let ctx = SetContext {
        store: &store,
        config: &config,
        roster,
    };
    let result = run(&ctx);
    let reloaded = store.load().expect("reload config");
    (result, reloaded)
}

fn args(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn registry_lists_every_key_once() {
    let registry = SettingRegistry::new();
    let keys = registry.keys_display_order();
    assert_eq!(keys.len(), 7);
    assert_eq!(keys[0], "api-base-url");
    assert!(registry.get("enrich").is_some());
    assert!(registry.get("theme").is_none());
    let sorted = registry.keys_sorted();
    assert_eq!(sorted.first(), Some(&"api-base-url"));
    assert_eq!(sorted.last(), Some(&"sync-debounce-ms"));
}

#[test]
fn boolean_setting_accepts_words() {
    let registry = SettingRegistry::new();
    let handler = registry.get("enrich").unwrap();
    let roster = Roster::new();

    let (message, config) = with_context(&roster, |ctx| handler.set(&args(&["off"]), ctx));
    assert_eq!(
        message.unwrap(),
        "✅ Set enrich to: off (tooltips will show placeholders)"
    );
    assert_eq!(config.enrich, Some(false));
    assert_eq!(handler.format(&config), "  enrich: off");

    let (result, _) = with_context(&roster, |ctx| handler.set(&args(&["maybe"]), ctx));
    assert!(matches!(result, Err(SettingError::InvalidBoolean(_))));
}

#[test]
fn number_setting_enforces_range() {
    let registry = SettingRegistry::new();
    let handler = registry.get("max-suggestions").unwrap();
    let roster = Roster::new();

    let (result, config) = with_context(&roster, |ctx| handler.set(&args(&["0"]), ctx));
    assert!(matches!(result, Err(SettingError::InvalidNumber { .. })));
    assert_eq!(config.max_suggestions, None);

    let (result, config) = with_context(&roster, |ctx| handler.set(&args(&["12"]), ctx));
    assert!(result.is_ok());
    assert_eq!(config.max_suggestions, Some(12));
}

#[test]
fn missing_args_are_reported() {
    let registry = SettingRegistry::new();
    let roster = Roster::new();
    for key in registry.keys_display_order() {
        let handler = registry.get(key).unwrap();
        let (result, _) = with_context(&roster, |ctx| handler.set(&[], ctx));
        assert!(
            matches!(result, Err(SettingError::MissingArgs { .. })),
            "{key} should require a value"
        );
    }
}

#[test]
fn api_base_url_must_be_http() {
    let registry = SettingRegistry::new();
    let handler = registry.get("api-base-url").unwrap();
    let roster = Roster::new();

    let (result, _) = with_context(&roster, |ctx| handler.set(&args(&["ftp://rules"]), ctx));
    assert!(matches!(result, Err(SettingError::InvalidUrl(_))));

    let (result, config) = with_context(&roster, |ctx| {
        handler.set(&args(&["http://localhost:3000/api/"]), ctx)
    });
    assert!(result.is_ok());
    assert_eq!(config.api_base_url(), "http://localhost:3000/api");
}

#[test]
fn default_character_must_exist_and_uses_stored_case() {
    let registry = SettingRegistry::new();
    let handler = registry.get("default-character").unwrap();
    let mut roster = Roster::new();
    roster.create("Tess Brightwater").unwrap();

    let (result, _) = with_context(&roster, |ctx| handler.set(&args(&["Nobody"]), ctx));
    assert!(matches!(result, Err(SettingError::UnknownCharacter { .. })));

    let (result, config) = with_context(&roster, |ctx| {
        handler.set(&args(&["tess", "brightwater"]), ctx)
    });
    assert!(result.is_ok());
    assert_eq!(config.default_character.as_deref(), Some("Tess Brightwater"));
}

#[test]
fn unset_restores_default() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::new(temp_dir.path().join("config.toml"));
    let roster = Roster::new();
    let registry = SettingRegistry::new();
    let handler = registry.get("sync-debounce-ms").unwrap();

    let config = store.load().unwrap();
    let ctx = SetContext {
        store: &store,
        config: &config,
        roster: &roster,
    };
    handler.set(&args(&["200"]), &ctx).unwrap();
    assert_eq!(store.load().unwrap().sync_debounce_ms, Some(200));

    let message = handler.unset(&ctx).unwrap();
    assert!(message.contains("default: 750"));
    assert_eq!(store.load().unwrap().sync_debounce_ms, None);
}
