//! Helper functions for settings operations.

use crate::core::config::data::Config;
use crate::core::config::ConfigStore;

use super::error::SettingError;

/// Wrapper around `ConfigStore::update` that maps errors to `SettingError::ConfigError`.
pub fn mutate_config<F>(store: &ConfigStore, f: F) -> Result<(), SettingError>
where
    F: FnOnce(&mut Config) -> Result<(), Box<dyn std::error::Error>>,
{
    store
        .update(f)
        .map_err(|e| SettingError::ConfigError(e.to_string()))
}

/// Like [`mutate_config`], returning `message` on success.
pub fn mutate_config_with_message<F>(
    store: &ConfigStore,
    f: F,
    message: String,
) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<(), Box<dyn std::error::Error>>,
{
    mutate_config(store, f)?;
    Ok(message)
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Format a boolean value for display.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
