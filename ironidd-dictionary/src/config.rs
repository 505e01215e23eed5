/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Parser configuration.
//!
//! This module provides configuration options for dictionary parsing.

/// Name of the synthetic object that holds free comments in editors.
pub const COMMENT_ONLY_OBJECT_NAME: &str = "CommentOnly";

/// Source text of the synthetic comment-only object.
pub const COMMENT_ONLY_OBJECT_TEXT: &str = "CommentOnly; ! Autogenerated comment only object.";

/// Default limit on nested `\include-file` chains.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 8;

/// Configuration for a dictionary parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Label for the root source in diagnostic locations.
    pub source_name: Option<String>,
    /// Maximum nesting of included sources.
    pub max_include_depth: usize,
    /// Whether `\include-file` directives are followed.
    pub resolve_includes: bool,
    /// Whether the synthetic `CommentOnly` object is prepended.
    pub insert_comment_only_object: bool,
}

impl ParserConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source_name: None,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            resolve_includes: true,
            insert_comment_only_object: false,
        }
    }

    /// Sets the root source label.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Sets the maximum include depth.
    #[must_use]
    pub const fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Sets whether includes are resolved.
    #[must_use]
    pub const fn with_resolve_includes(mut self, resolve: bool) -> Self {
        self.resolve_includes = resolve;
        self
    }

    /// Sets whether the `CommentOnly` object is prepended.
    #[must_use]
    pub const fn with_comment_only_object(mut self, insert: bool) -> Self {
        self.insert_comment_only_object = insert;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for parser configuration.
#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    source_name: Option<String>,
    max_include_depth: Option<usize>,
    resolve_includes: Option<bool>,
    insert_comment_only_object: bool,
}

impl ParserConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root source label.
    #[must_use]
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Sets the maximum include depth.
    #[must_use]
    pub const fn max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = Some(depth);
        self
    }

    /// Sets whether includes are resolved.
    #[must_use]
    pub const fn resolve_includes(mut self, resolve: bool) -> Self {
        self.resolve_includes = Some(resolve);
        self
    }

    /// Sets whether the `CommentOnly` object is prepended.
    #[must_use]
    pub const fn insert_comment_only_object(mut self, insert: bool) -> Self {
        self.insert_comment_only_object = insert;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ParserConfig {
        let mut config = ParserConfig::new();
        config.source_name = self.source_name;
        if let Some(depth) = self.max_include_depth {
            config.max_include_depth = depth;
        }
        if let Some(resolve) = self.resolve_includes {
            config.resolve_includes = resolve;
        }
        config.insert_comment_only_object = self.insert_comment_only_object;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_new() {
        let config = ParserConfig::new();
        assert!(config.source_name.is_none());
        assert_eq!(config.max_include_depth, DEFAULT_MAX_INCLUDE_DEPTH);
        assert!(config.resolve_includes);
        assert!(!config.insert_comment_only_object);
    }

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfigBuilder::new()
            .source_name("Energy+.idd")
            .max_include_depth(2)
            .resolve_includes(false)
            .insert_comment_only_object(true)
            .build();

        assert_eq!(config.source_name.as_deref(), Some("Energy+.idd"));
        assert_eq!(config.max_include_depth, 2);
        assert!(!config.resolve_includes);
        assert!(config.insert_comment_only_object);
    }
}
