/*!
 * In-run translation memoization.
 *
 * Localization trees repeat text across files (button labels, shared
 * concept names). Within one run, identical requests hit this cache
 * instead of the backend.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

/// Cache key combining source text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source_text: String,
    source_language: String,
    target_language: String,
}

/// Hit/miss counters, reported in the run summary
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    /// Number of lookups answered from the cache
    pub hits: usize,

    /// Number of lookups that fell through to the backend
    pub misses: usize,
}

/// Translation cache for one run
pub struct TranslationCache {
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
    stats: Arc<RwLock<CacheStats>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, source_text: &str, source_language: &str, target_language: &str) -> Option<String> {
        let key = CacheKey {
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        };

        let found = self.entries.read().get(&key).cloned();
        let mut stats = self.stats.write();
        if found.is_some() {
            stats.hits += 1;
            debug!("Translation cache hit ({} -> {})", source_language, target_language);
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Store a translation in the cache
    pub fn store(&self, source_text: &str, source_language: &str, target_language: &str, translation: &str) {
        let key = CacheKey {
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        };
        self.entries.write().insert(key, translation.to_string());
    }

    /// Current hit/miss counters
    pub fn stats(&self) -> CacheStats {
        *self.stats.read()
    }

    /// Number of cached translations
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            stats: self.stats.clone(),
        }
    }
}
