//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    max_suggestions_handler, request_timeout_handler, sync_debounce_handler, ApiBaseUrlHandler,
    DataDirHandler, DefaultCharacterHandler, EnrichHandler,
};
use super::SettingHandler;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `sheetkeep config show` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(ApiBaseUrlHandler));
        registry.register(Box::new(EnrichHandler));
        registry.register(Box::new(request_timeout_handler()));
        registry.register(Box::new(max_suggestions_handler()));
        registry.register(Box::new(sync_debounce_handler()));
        registry.register(Box::new(DataDirHandler));
        registry.register(Box::new(DefaultCharacterHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in sorted order.
    pub fn keys_sorted(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.handlers.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
