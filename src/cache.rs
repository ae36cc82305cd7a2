use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;

use crate::engine::Translation;

/// Bounded memo of completed translations keyed by exact input text.
///
/// Entries are evicted only by capacity pressure, never by age. Degraded
/// results (those carrying a warning) are not stored; the engine re-attempts
/// them on the next identical request.
#[derive(Debug)]
pub struct ResponseCache {
    inner: Mutex<LruCache<String, Translation>>,
}

impl ResponseCache {
    /// # Panics
    ///
    /// Panics if `capacity` is zero; config validation rejects that earlier.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).expect("cache capacity must be greater than 0");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a cached translation, refreshing its recency on a hit.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Translation> {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(text).cloned()
    }

    pub fn put(&self, text: String, translation: Translation) {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.put(text, translation);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
