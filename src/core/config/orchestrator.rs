//! Cached access to `config.toml`.
//!
//! The parsed config is kept in memory and re-read only when the file's
//! modification time changes, so repeated loads from the CLI and the editor
//! stay cheap while still noticing edits made by another process.

use crate::core::config::data::Config;
use crate::core::config::io::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

#[derive(Default)]
struct CachedConfig {
    config: Option<Config>,
    modified: Option<SystemTime>,
}

pub struct ConfigStore {
    path: PathBuf,
    cache: Mutex<CachedConfig>,
}

static OVERRIDE_PATH: OnceLock<PathBuf> = OnceLock::new();
static GLOBAL_STORE: OnceLock<Result<ConfigStore, String>> = OnceLock::new();

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cache: Mutex::new(CachedConfig::default()),
        }
    }

    /// The process-wide store, rooted at `--config` if one was given.
    pub fn global() -> Result<&'static ConfigStore, ConfigError> {
        let store = GLOBAL_STORE.get_or_init(|| match OVERRIDE_PATH.get() {
            Some(path) => Ok(ConfigStore::new(path.clone())),
            None => Config::config_path()
                .map(ConfigStore::new)
                .map_err(|err| err.to_string()),
        });
        store.as_ref().map_err(|_| ConfigError::NoConfigDir)
    }

    /// Point the global store at a specific file. Only effective before the
    /// first call to [`ConfigStore::global`].
    pub fn use_path(path: PathBuf) {
        let _ = OVERRIDE_PATH.set(path);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut cache = self.lock();
        self.refresh(&mut cache)?;
        Ok(cache.config.clone().unwrap_or_default())
    }

    /// Apply `mutator` to the current config and persist the result.
    pub fn update<F, T>(&self, mutator: F) -> Result<T, Box<dyn std::error::Error>>
    where
        F: FnOnce(&mut Config) -> Result<T, Box<dyn std::error::Error>>,
    {
        let mut cache = self.lock();
        self.refresh(&mut cache)?;

        let mut working = cache.config.clone().unwrap_or_default();
        let result = mutator(&mut working)?;
        working.save_to_path(&self.path)?;

        cache.modified = modified_time(&self.path);
        cache.config = Some(working);
        Ok(result)
    }

    fn refresh(&self, cache: &mut CachedConfig) -> Result<(), ConfigError> {
        let on_disk = modified_time(&self.path);
        if cache.config.is_none() || cache.modified != on_disk {
            cache.config = Some(Config::load_from_path(&self.path)?);
            cache.modified = on_disk;
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CachedConfig> {
        // A poisoned lock only means a mutator panicked; the cache is still usable.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        ConfigStore::global()?.load()
    }

    pub fn mutate<F, T>(mutator: F) -> Result<T, Box<dyn std::error::Error>>
    where
        F: FnOnce(&mut Config) -> Result<T, Box<dyn std::error::Error>>,
    {
        ConfigStore::global()?.update(mutator)
    }
}
