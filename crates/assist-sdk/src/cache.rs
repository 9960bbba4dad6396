//! Module cache
//!
//! Resolved modules keyed by module id and rule set version. Concurrent
//! loads of the same key may both resolve; the first one published is the
//! one every caller gets back.

use assist_compiler::ResolvedModule;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache key: module id plus rule set version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleKey {
    pub id: String,
    pub version: Option<String>,
}

impl ModuleKey {
    pub fn new(id: impl Into<String>, version: Option<String>) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

impl From<&assist_core::Module> for ModuleKey {
    fn from(module: &assist_core::Module) -> Self {
        Self::new(module.id(), module.metadata.rule_set_version.clone())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries in cache
    pub size: usize,
}

impl CacheStats {
    /// Calculate cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Concurrent cache of resolved modules
#[derive(Debug, Default)]
pub struct ModuleCache {
    entries: DashMap<ModuleKey, Arc<ResolvedModule>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached module for `key`, counting the hit or miss
    pub fn get(&self, key: &ModuleKey) -> Option<Arc<ResolvedModule>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Cached module for `key`, or build it with `resolve` and publish it.
    ///
    /// A failed build leaves the cache untouched.
    pub fn get_or_try_insert<E, F>(&self, key: ModuleKey, resolve: F) -> Result<Arc<ResolvedModule>, E>
    where
        F: FnOnce() -> Result<ResolvedModule, E>,
    {
        if let Some(cached) = self.get(&key) {
            tracing::debug!("Module cache hit for {:?}", key);
            return Ok(cached);
        }

        let module = Arc::new(resolve()?);
        Ok(self.publish(key, module))
    }

    /// Publish `module` under `key` unless another module got there first
    pub fn publish(&self, key: ModuleKey, module: Arc<ResolvedModule>) -> Arc<ResolvedModule> {
        let entry = self.entries.entry(key).or_insert(module);
        Arc::clone(entry.value())
    }

    /// Drop one entry; returns whether it was cached
    pub fn invalidate(&self, key: &ModuleKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every version of a module; returns how many entries went
    pub fn invalidate_module(&self, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.id != id);
        before - self.entries.len()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_compiler::ReferenceResolver;
    use assist_core::ast::{Metadata, Module};

    fn resolved(id: &str, version: &str) -> ResolvedModule {
        let module = Module::new(Metadata::new(id, id).with_rule_set_version(version));
        ReferenceResolver::resolve(module).unwrap()
    }

    fn key(id: &str, version: &str) -> ModuleKey {
        ModuleKey::new(id, Some(version.to_string()))
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = ModuleCache::new();
        let mut builds = 0;

        for _ in 0..3 {
            let module = cache
                .get_or_try_insert(key("a", "1"), || {
                    builds += 1;
                    Ok::<_, ()>(resolved("a", "1"))
                })
                .unwrap();
            assert_eq!(module.id(), "a");
        }

        assert_eq!(builds, 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_build_not_cached() {
        let cache = ModuleCache::new();
        let result = cache.get_or_try_insert(key("a", "1"), || Err("broken"));
        assert_eq!(result.unwrap_err(), "broken");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_first_publisher_wins() {
        let cache = ModuleCache::new();
        let first = cache.publish(key("a", "1"), Arc::new(resolved("a", "1")));
        let second = cache.publish(key("a", "1"), Arc::new(resolved("a", "1")));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_versions_cached_separately() {
        let cache = ModuleCache::new();
        cache.publish(key("a", "1"), Arc::new(resolved("a", "1")));
        cache.publish(key("a", "2"), Arc::new(resolved("a", "2")));
        cache.publish(key("b", "1"), Arc::new(resolved("b", "1")));
        assert_eq!(cache.len(), 3);

        assert!(cache.invalidate(&key("b", "1")));
        assert!(!cache.invalidate(&key("b", "1")));
        assert_eq!(cache.invalidate_module("a"), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ModuleCache::new();
        cache.publish(key("a", "1"), Arc::new(resolved("a", "1")));
        cache.clear();
        assert!(cache.get(&key("a", "1")).is_none());
    }
}
