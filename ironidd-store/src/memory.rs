/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! In-memory dictionary sources.
//!
//! This module provides a simple name to text map suitable for testing and
//! for dictionaries embedded in the binary.

use ironidd_core::error::SourceError;
use ironidd_dictionary::SourceLoader;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory dictionary sources.
///
/// Sources can be added after construction, so a loader shared with a cache
/// can be extended at runtime.
#[derive(Debug, Default)]
pub struct MemorySources {
    /// Source texts indexed by name.
    sources: RwLock<HashMap<String, String>>,
}

impl MemorySources {
    /// Creates an empty source map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source and returns the map, for chained construction.
    ///
    /// # Arguments
    /// * `name` - Source name used by `\include-file`
    /// * `text` - Full dictionary text
    #[must_use]
    pub fn with_source(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Adds or replaces a source.
    ///
    /// # Arguments
    /// * `name` - Source name used by `\include-file`
    /// * `text` - Full dictionary text
    pub fn insert(&self, name: impl Into<String>, text: impl Into<String>) {
        self.sources.write().insert(name.into(), text.into());
    }

    /// Removes a source, returning its text.
    pub fn remove(&self, name: &str) -> Option<String> {
        self.sources.write().remove(name)
    }

    /// Returns the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Returns true if no source is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.read().is_empty()
    }

    /// Checks if a source with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.read().contains_key(name)
    }
}

impl SourceLoader for MemorySources {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        self.sources
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironidd_dictionary::DictionaryParser;

    #[test]
    fn test_memory_sources_new() {
        let sources = MemorySources::new();
        assert!(sources.is_empty());
        assert!(matches!(
            sources.load("missing.idd"),
            Err(SourceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_memory_sources_insert_and_load() {
        let sources = MemorySources::new().with_source("a.idd", "A;\n");
        sources.insert("b.idd", "B;\n");

        assert_eq!(sources.len(), 2);
        assert!(sources.contains("b.idd"));
        assert_eq!(sources.load("a.idd").unwrap(), "A;\n");

        assert_eq!(sources.remove("a.idd").as_deref(), Some("A;\n"));
        assert!(!sources.contains("a.idd"));
    }

    #[test]
    fn test_memory_sources_resolve_includes() {
        let sources = MemorySources::new()
            .with_source("base.idd", "Shared;\nRemoved;\n")
            .with_source(
                "main.idd",
                "\\include-file base.idd\n\\remove-object Removed\nLocal;\n",
            );
        let outcome = DictionaryParser::new()
            .with_loader(&sources)
            .load("main.idd")
            .unwrap();
        let names: Vec<_> = outcome.dictionary.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Shared", "Local"]);
    }
}
