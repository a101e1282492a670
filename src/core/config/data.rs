use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration, stored as `config.toml` in the platform config dir.
///
/// Every field is optional; the effective values (with defaults applied)
/// come from the accessors in `defaults.rs`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the rules API used for tooltips and autocomplete
    pub api_base_url: Option<String>,
    /// Quiet period before edits are written to disk, in milliseconds
    pub sync_debounce_ms: Option<u64>,
    /// Per-request timeout for rules lookups, in seconds
    pub request_timeout_secs: Option<u64>,
    /// Maximum number of autocomplete suggestions shown
    pub max_suggestions: Option<usize>,
    /// Fetch descriptive text for items, spells and feats
    pub enrich: Option<bool>,
    /// Directory holding `roster.json` (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Character whose tab is opened first in the editor
    pub default_character: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.local/share/sheetkeep` → `~/.local/share/sheetkeep`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
