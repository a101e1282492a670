//! The `enrich` switch.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{format_bool, mutate_config_with_message, parse_bool};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::Config;

/// Turns rules lookups (tooltips and autocomplete) on or off.
pub struct EnrichHandler;

impl SettingHandler for EnrichHandler {
    fn key(&self) -> &'static str {
        "enrich"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let input = args.join(" ");
        if input.trim().is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To turn rules tooltips on or off, specify on or off:",
                example: "sheetkeep config set enrich off",
            });
        }
        let enabled = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;

        let note = if enabled {
            ""
        } else {
            " (tooltips will show placeholders)"
        };
        mutate_config_with_message(
            ctx.store,
            move |config| {
                config.enrich = Some(enabled);
                Ok(())
            },
            format!("✅ Set enrich to: {}{note}", format_bool(enabled)),
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx.store,
            |config| {
                config.enrich = None;
                Ok(())
            },
            "✅ Unset enrich (will use default: on)".to_string(),
        )
    }

    fn format(&self, config: &Config) -> String {
        match config.enrich {
            Some(enabled) => format!("  enrich: {}", format_bool(enabled)),
            None => "  enrich: (unset, default: on)".to_string(),
        }
    }
}
