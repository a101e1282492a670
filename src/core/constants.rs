//! Shared constants used across the application

pub const DEFAULT_API_BASE_URL: &str = "https://www.dnd5eapi.co/api";
pub const DEFAULT_SYNC_DEBOUNCE_MS: u64 = 750;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

/// Shown wherever a rules lookup produced nothing.
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available.";

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "SHEETKEEP_LOG";
