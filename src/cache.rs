//! Fragment parse caching
//!
//! This module memoizes fragment → [`Route`] parsing with an LRU eviction
//! policy. Parsing is pure, so a cached result is always valid; entities
//! are never cached here — view hydration re-derives them from the store
//! on every pass.

use crate::route::Route;
use crate::{fragment, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache performance statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Fragment parse cache with LRU eviction
///
/// Default capacity: 256 entries.
#[derive(Debug)]
pub struct ParseCache {
    entries: LruCache<String, Route>,
    stats: CacheStats,
}

impl ParseCache {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).expect("Cache capacity must be non-zero");
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Parse a fragment, memoized.
    pub fn parse(&mut self, raw: &str) -> Route {
        if let Some(route) = self.entries.get(raw) {
            self.stats.hits += 1;
            trace_log!("Parse cache hit for '{}'", raw);
            return route.clone();
        }

        self.stats.misses += 1;
        trace_log!("Parse cache miss for '{}'", raw);
        let route = fragment::parse(raw);
        self.entries.push(raw.to_string(), route.clone());
        route
    }

    pub fn clear(&mut self) {
        trace_log!("Clearing parse cache");
        self.entries.clear();
        self.stats.invalidations += 1;
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ParseCache {
    fn clone(&self) -> Self {
        let cap = self.entries.cap();
        Self {
            entries: LruCache::new(cap),
            stats: self.stats.clone(),
        }
    }
}
