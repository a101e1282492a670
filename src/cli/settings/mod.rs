//! Settings management for the `config set` and `config unset` commands.
//!
//! Each configuration key has a handler implementing [`SettingHandler`].
//! Handlers come in a few shapes:
//!
//! - Boolean settings (`enrich`)
//! - Numeric settings with a valid range (`sync-debounce-ms`, `max-suggestions`)
//! - Validated single values (`api-base-url`, `data-dir`, `default-character`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::character::Roster;
use crate::core::config::data::Config;
use crate::core::config::ConfigStore;

/// Context provided to setting handlers during set/unset operations.
pub struct SetContext<'a> {
    pub store: &'a ConfigStore,
    pub config: &'a Config,
    /// Characters on disk, used to validate `default-character`.
    pub roster: &'a Roster,
}

/// Trait for handling a configuration setting.
///
/// Each implementation handles a specific configuration key,
/// providing set, unset, and format operations.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the configuration value from the words following the key.
    ///
    /// Returns a success message to display.
    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Unset (clear) the configuration value so the default applies again.
    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Format the current value for display in `config show` output.
    fn format(&self, config: &Config) -> String;
}

#[cfg(test)]
mod tests;
