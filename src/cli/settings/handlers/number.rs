//! Numeric setting handlers with an accepted range.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{mutate_config_with_message, success_set};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::Config;
use crate::core::constants::{
    DEFAULT_MAX_SUGGESTIONS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SYNC_DEBOUNCE_MS,
};

/// Data-driven handler for whole-number settings.
pub struct NumberHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    min: u64,
    max: u64,
    default_value: u64,
    get: fn(&Config) -> Option<u64>,
    set_field: fn(&mut Config, Option<u64>),
}

impl NumberHandler {
    fn parse(&self, input: &str) -> Result<u64, SettingError> {
        input
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|value| (self.min..=self.max).contains(value))
            .ok_or_else(|| SettingError::InvalidNumber {
                key: self.key,
                input: input.to_string(),
                min: self.min,
                max: self.max,
            })
    }
}

impl SettingHandler for NumberHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let value = self.parse(&args.join(" "))?;
        let set_field = self.set_field;
        mutate_config_with_message(
            ctx.store,
            move |config| {
                set_field(config, Some(value));
                Ok(())
            },
            success_set(self.key, &value.to_string()),
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let set_field = self.set_field;
        mutate_config_with_message(
            ctx.store,
            move |config| {
                set_field(config, None);
                Ok(())
            },
            format!(
                "✅ Unset {} (will use default: {})",
                self.key, self.default_value
            ),
        )
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {}", self.key, value),
            None => format!("  {}: (unset, default: {})", self.key, self.default_value),
        }
    }
}

/// Create a handler for the `sync-debounce-ms` setting.
pub fn sync_debounce_handler() -> NumberHandler {
    NumberHandler {
        key: "sync-debounce-ms",
        hint: "To change how long edits wait before saving, give milliseconds:",
        example: "sheetkeep config set sync-debounce-ms 500",
        min: 0,
        max: 60_000,
        default_value: DEFAULT_SYNC_DEBOUNCE_MS,
        get: |c| c.sync_debounce_ms,
        set_field: |c, v| c.sync_debounce_ms = v,
    }
}

/// Create a handler for the `request-timeout-secs` setting.
pub fn request_timeout_handler() -> NumberHandler {
    NumberHandler {
        key: "request-timeout-secs",
        hint: "To change the rules API timeout, give seconds:",
        example: "sheetkeep config set request-timeout-secs 5",
        min: 1,
        max: 120,
        default_value: DEFAULT_REQUEST_TIMEOUT_SECS,
        get: |c| c.request_timeout_secs,
        set_field: |c, v| c.request_timeout_secs = v,
    }
}

/// Create a handler for the `max-suggestions` setting.
pub fn max_suggestions_handler() -> NumberHandler {
    NumberHandler {
        key: "max-suggestions",
        hint: "To change how many autocomplete suggestions are shown, give a count:",
        example: "sheetkeep config set max-suggestions 12",
        min: 1,
        max: 50,
        default_value: DEFAULT_MAX_SUGGESTIONS as u64,
        get: |c| c.max_suggestions.map(|max| max as u64),
        set_field: |c, v| c.max_suggestions = v.map(|max| max as usize),
    }
}
