/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Shared dictionary cache.
//!
//! Dictionaries are parsed once per source name and shared for the life of
//! the process. Lookups take a read lock only; parsing happens outside any
//! lock, and when two threads race on the same name the first insert wins.

use ironidd_core::error::Result;
use ironidd_dictionary::{DictionaryParser, ParseOutcome, ParserConfig, SourceLoader};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Load-once cache of parsed dictionaries keyed by source name.
#[derive(Debug)]
pub struct DictionaryCache<L> {
    /// Supplies raw text for roots and their includes.
    loader: L,
    /// Parser settings applied to every load.
    config: ParserConfig,
    /// Parsed dictionaries indexed by source name.
    entries: RwLock<HashMap<String, Arc<ParseOutcome>>>,
}

impl<L: SourceLoader> DictionaryCache<L> {
    /// Creates an empty cache over a loader.
    ///
    /// # Arguments
    /// * `loader` - Source loader for root and included sources
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            config: ParserConfig::default(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the parser configuration used for future loads.
    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the underlying loader.
    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Returns a cached dictionary without loading.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ParseOutcome>> {
        self.entries.read().get(name).cloned()
    }

    /// Returns the cached dictionary, loading and parsing it on first use.
    ///
    /// # Arguments
    /// * `name` - Root source name understood by the loader
    ///
    /// # Errors
    /// Returns an error if the root source cannot be loaded. Failures are not
    /// cached.
    pub fn get_or_load(&self, name: &str) -> Result<Arc<ParseOutcome>> {
        if let Some(hit) = self.get(name) {
            trace!(source = name, "dictionary cache hit");
            return Ok(hit);
        }

        let outcome = DictionaryParser::new()
            .with_config(&self.config)
            .with_loader(&self.loader)
            .load(name)?;
        debug!(
            source = name,
            objects = outcome.dictionary.len(),
            diagnostics = outcome.diagnostics.len(),
            "caching dictionary"
        );

        let mut entries = self.entries.write();
        let entry = entries
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(outcome));
        Ok(Arc::clone(entry))
    }

    /// Drops a cached dictionary so the next lookup reloads it.
    ///
    /// Returns true if an entry was removed.
    pub fn invalidate(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    /// Drops every cached dictionary.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of cached dictionaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Checks if a dictionary is cached under the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySources;
    use ironidd_core::error::{IddError, SourceError};

    fn cache() -> DictionaryCache<MemorySources> {
        DictionaryCache::new(
            MemorySources::new()
                .with_source("base.idd", "Zone,\n  A1; \\field Name\n")
                .with_source("broken.idd", "Zone,\n  A1, \\field Name\n"),
        )
    }

    #[test]
    fn test_cache_loads_once() {
        let cache = cache();
        assert!(cache.is_empty());

        let first = cache.get_or_load("base.idd").unwrap();
        let second = cache.get_or_load("base.idd").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(first.dictionary.contains("zone"));
    }

    #[test]
    fn test_cache_keeps_diagnostics() {
        let cache = cache();
        let outcome = cache.get_or_load("broken.idd").unwrap();
        assert!(outcome.has_errors());
        assert!(outcome.dictionary.is_empty());
        assert!(cache.contains("broken.idd"));
    }

    #[test]
    fn test_cache_does_not_store_failures() {
        let cache = cache();
        let err = cache.get_or_load("missing.idd").unwrap_err();
        assert!(matches!(err, IddError::Source(SourceError::NotFound { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_invalidate_reloads() {
        let cache = cache();
        let first = cache.get_or_load("base.idd").unwrap();
        cache.loader().insert("base.idd", "Zone;\nSpace;\n");

        assert!(Arc::ptr_eq(&first, &cache.get_or_load("base.idd").unwrap()));
        assert!(cache.invalidate("base.idd"));
        assert!(!cache.invalidate("base.idd"));

        let reloaded = cache.get_or_load("base.idd").unwrap();
        assert_eq!(reloaded.dictionary.len(), 2);
        cache.clear();
        assert!(cache.get("base.idd").is_none());
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = cache();
        let outcomes: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.get_or_load("base.idd").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let cached = cache.get("base.idd").unwrap();
        assert!(outcomes.iter().all(|o| Arc::ptr_eq(o, &cached)));
    }

    #[test]
    fn test_cache_applies_config() {
        let cache = cache().with_config(ParserConfig::new().with_comment_only_object(true));
        let outcome = cache.get_or_load("base.idd").unwrap();
        assert_eq!(outcome.dictionary.len(), 2);
    }
}
