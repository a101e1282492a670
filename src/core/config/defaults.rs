use std::path::Path;
use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_SUGGESTIONS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SYNC_DEBOUNCE_MS,
};

impl Config {
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn sync_debounce(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms.unwrap_or(DEFAULT_SYNC_DEBOUNCE_MS))
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_SUGGESTIONS)
    }

    pub fn enrich_enabled(&self) -> bool {
        self.enrich.unwrap_or(true)
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}
