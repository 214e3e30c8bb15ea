//! Shared store of raw tool output for persistent providers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::provider::ProviderKind;

/// Identity of one provider invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: ProviderKind,
    pub binary: PathBuf,
    pub movie_file: PathBuf,
}

impl CacheKey {
    pub fn new(kind: ProviderKind, binary: &Path, movie_file: &Path) -> Self {
        Self {
            kind,
            binary: binary.to_path_buf(),
            movie_file: movie_file.to_path_buf(),
        }
    }
}

/// Raw diagnostic text keyed by [`CacheKey`].
///
/// Cloning yields another handle onto the same map. Entries are never
/// evicted, so two movies reading the same key see the same text even if the
/// file changed on disk in between.
#[derive(Debug, Clone, Default)]
pub struct OutputCache {
    entries: Arc<Mutex<HashMap<CacheKey, String>>>,
}

impl OutputCache {
    /// Create an empty, private cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used when no cache is injected.
    pub fn global() -> OutputCache {
        static GLOBAL: OnceLock<OutputCache> = OnceLock::new();
        GLOBAL.get_or_init(OutputCache::new).clone()
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, output: String) {
        self.lock().insert(key, output);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
