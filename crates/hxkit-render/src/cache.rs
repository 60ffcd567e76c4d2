//! Compiled template cache.
//!
//! Compiling a template set means loading every identifier from its source and
//! parsing it, so components share compiled sets through a [`TemplateCache`].
//! By default all components use one process-wide [`MemoryCache`]
//! ([`global_cache`]); a component can be given its own cache, or [`NoCache`]
//! to always compile.
//!
//! # Cache keys
//!
//! A [`CacheKey`] identifies a compiled set by:
//!
//! - the engine name
//! - the full, ordered template identifier list
//! - a BLAKE3 hash of the sorted names of the effective template functions
//!
//! Only function *names* take part in the key. The compiled set is a pure
//! function of the template sources and the function names the engine binds;
//! implementations are supplied again on every execution, so two components
//! registering different closures under the same name share an entry without
//! seeing each other's behavior.
//!
//! # Concurrency
//!
//! [`MemoryCache`] is a concurrent map. Two requests missing the same key at
//! the same time both compile and both store; the last store wins. Entries are
//! complete `Arc`s, so a reader never observes a half-built template.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::engine::CompiledTemplate;
use crate::functions::FunctionMap;

/// Identity of a compiled template set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    engine: &'static str,
    templates: Vec<String>,
    functions_hash: String,
}

impl CacheKey {
    /// Builds the key for a template set and function registry.
    pub fn new(engine: &'static str, templates: &[String], functions: &FunctionMap) -> Self {
        Self::from_names(engine, templates, functions.keys().map(|s| s.as_str()))
    }

    /// Builds a key from function names in any order.
    pub fn from_names<'a>(
        engine: &'static str,
        templates: &[String],
        function_names: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut names: Vec<&str> = function_names.into_iter().collect();
        names.sort_unstable();
        names.dedup();
        let hash = blake3::hash(names.join(",").as_bytes());

        Self {
            engine,
            templates: templates.to_vec(),
            functions_hash: hash.to_hex().to_string(),
        }
    }

    pub fn engine(&self) -> &str {
        self.engine
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Hex digest of the sorted function names.
    pub fn functions_hash(&self) -> &str {
        &self.functions_hash
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.engine,
            self.templates.join(","),
            &self.functions_hash[..16]
        )
    }
}

/// Storage for compiled template sets.
pub trait TemplateCache: Send + Sync {
    /// Returns the entry for `key`, if any.
    fn lookup(&self, key: &CacheKey) -> Option<CompiledTemplate>;

    /// Stores `template` under `key`, replacing any previous entry.
    fn store(&self, key: CacheKey, template: CompiledTemplate);

    /// Removes every entry.
    fn clear(&self);

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counters kept by a [`MemoryCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

/// In-memory concurrent cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, CompiledTemplate>,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the hit, miss and store counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Resets the counters, keeping entries.
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.stores.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl TemplateCache for MemoryCache {
    fn lookup(&self, key: &CacheKey) -> Option<CompiledTemplate> {
        let found = self.entries.get(key).map(|entry| Arc::clone(entry.value()));
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn store(&self, key: CacheKey, template: CompiledTemplate) {
        self.stores.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(key, template);
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl TemplateCache for NoCache {
    fn lookup(&self, _key: &CacheKey) -> Option<CompiledTemplate> {
        None
    }

    fn store(&self, _key: CacheKey, _template: CompiledTemplate) {}

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}

static GLOBAL_CACHE: Lazy<Arc<MemoryCache>> = Lazy::new(|| Arc::new(MemoryCache::new()));

/// The process-wide cache used by components that were not given one.
pub fn global_cache() -> Arc<MemoryCache> {
    Arc::clone(&GLOBAL_CACHE)
}
