//! Handlers for single-value settings that need validation.

use std::path::PathBuf;

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{mutate_config_with_message, success_set, success_unset};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{path_display, Config};
use crate::core::constants::DEFAULT_API_BASE_URL;
use crate::utils::url::normalize_base_url;

/// Handler for the `api-base-url` setting.
pub struct ApiBaseUrlHandler;

impl SettingHandler for ApiBaseUrlHandler {
    fn key(&self) -> &'static str {
        "api-base-url"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To point lookups at another rules server, give its API URL:",
                example: "sheetkeep config set api-base-url http://localhost:3000/api",
            });
        };

        let lowered = input.trim().to_ascii_lowercase();
        if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
            return Err(SettingError::InvalidUrl(input.clone()));
        }

        let url = normalize_base_url(input.trim());
        let message = success_set("api-base-url", &url);
        mutate_config_with_message(
            ctx.store,
            move |config| {
                config.api_base_url = Some(url);
                Ok(())
            },
            message,
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx.store,
            |config| {
                config.api_base_url = None;
                Ok(())
            },
            format!("✅ Unset api-base-url (will use default: {DEFAULT_API_BASE_URL})"),
        )
    }

    fn format(&self, config: &Config) -> String {
        match &config.api_base_url {
            Some(url) => format!("  api-base-url: {url}"),
            None => format!("  api-base-url: (unset, default: {DEFAULT_API_BASE_URL})"),
        }
    }
}

/// Handler for the `data-dir` setting.
pub struct DataDirHandler;

impl SettingHandler for DataDirHandler {
    fn key(&self) -> &'static str {
        "data-dir"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To keep the roster somewhere else, give a directory:",
                example: "sheetkeep config set data-dir ~/Dropbox/sheetkeep",
            });
        }

        let dir = expand_home(&args.join(" "));
        let message = success_set("data-dir", &path_display(&dir));
        mutate_config_with_message(
            ctx.store,
            move |config| {
                config.data_dir = Some(dir);
                Ok(())
            },
            message,
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx.store,
            |config| {
                config.data_dir = None;
                Ok(())
            },
            "✅ Unset data-dir (will use the platform data directory)".to_string(),
        )
    }

    fn format(&self, config: &Config) -> String {
        match &config.data_dir {
            Some(dir) => format!("  data-dir: {}", path_display(dir)),
            None => "  data-dir: (unset, platform default)".to_string(),
        }
    }
}

fn expand_home(input: &str) -> PathBuf {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(trimmed)
}

/// Handler for the `default-character` setting.
pub struct DefaultCharacterHandler;

impl SettingHandler for DefaultCharacterHandler {
    fn key(&self) -> &'static str {
        "default-character"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To open a character's tab first, give the character name:",
                example: "sheetkeep config set default-character Tess",
            });
        }

        let input = args.join(" ");
        let name = ctx
            .roster
            .get(&input)
            .map(|record| record.name.clone())
            .ok_or_else(|| SettingError::UnknownCharacter {
                input: input.clone(),
            })?;

        let message = success_set("default-character", &name);
        mutate_config_with_message(
            ctx.store,
            move |config| {
                config.default_character = Some(name);
                Ok(())
            },
            message,
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx.store,
            |config| {
                config.default_character = None;
                Ok(())
            },
            success_unset("default-character"),
        )
    }

    fn format(&self, config: &Config) -> String {
        match &config.default_character {
            Some(name) => format!("  default-character: {name}"),
            None => "  default-character: (unset)".to_string(),
        }
    }
}
