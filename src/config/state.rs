// Application state module
// Shared by every connection for the lifetime of the process

use std::sync::atomic::{AtomicBool, Ordering};

use super::types::Config;
use crate::store::{CollectionStore, JsonFileStore};
use crate::users::UserService;

/// Application state
pub struct AppState {
    pub config: Config,
    pub users: UserService,

    // Cached config values for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Build state backed by the JSON file named in `storage.path`
    pub fn new(config: &Config) -> Self {
        let store = JsonFileStore::new(&config.storage.path);
        Self::with_store(config, Box::new(store))
    }

    /// Build state over any collection store
    pub fn with_store(config: &Config, store: Box<dyn CollectionStore>) -> Self {
        Self {
            config: config.clone(),
            users: UserService::new(store, config.storage.serialize_writes),
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}
