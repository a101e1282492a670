use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::lookup::LookupKind;
use crate::api::{ApiReference, RulesEntry};

#[derive(Default)]
struct CacheState {
    entries: HashMap<(LookupKind, String), Option<RulesEntry>>,
    indices: HashMap<String, Arc<Vec<ApiReference>>>,
}

/// Session-lifetime memo of rules lookups.
///
/// Both hits and definitive misses are remembered so a name typed into
/// several fields is only resolved once. Lookups that failed on the network
/// are never stored; they are retried on the next request.
#[derive(Default)]
pub struct LookupCache {
    state: Mutex<CacheState>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `None` when nothing is cached; `Some(None)` for a remembered miss.
    pub fn entry(&self, kind: LookupKind, key: &str) -> Option<Option<RulesEntry>> {
        self.lock().entries.get(&(kind, key.to_string())).cloned()
    }

    pub fn store_entry(&self, kind: LookupKind, key: &str, entry: Option<RulesEntry>) {
        self.lock().entries.insert((kind, key.to_string()), entry);
    }

    pub fn index(&self, category: &str) -> Option<Arc<Vec<ApiReference>>> {
        self.lock().indices.get(category).cloned()
    }

    pub fn store_index(&self, category: &str, index: Vec<ApiReference>) -> Arc<Vec<ApiReference>> {
        let index = Arc::new(index);
        self.lock()
            .indices
            .insert(category.to_string(), Arc::clone(&index));
        index
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.indices.clear();
    }
}
