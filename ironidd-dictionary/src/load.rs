/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Parse entry points.
//!
//! A parse always produces a [`Dictionary`] together with every diagnostic
//! raised along the way. Callers that want an all-or-nothing result use
//! [`ParseOutcome::into_strict`].

use crate::assembler::assemble;
use crate::config::ParserConfig;
use crate::include::{Resolver, SourceLoader};
use crate::parser::parse_source;
use crate::schema::Dictionary;
use ironidd_core::diagnostic::{Diagnostic, Diagnostics};
use ironidd_core::error::{MalformedDictionary, Result, SourceError};
use tracing::debug;

const ANONYMOUS_SOURCE: &str = "<input>";

/// A dictionary and the diagnostics raised while building it.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// The assembled dictionary, without any object that failed to parse.
    pub dictionary: Dictionary,
    /// Everything reported during the parse.
    pub diagnostics: Diagnostics,
}

impl ParseOutcome {
    /// Returns true if nothing above informational severity was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.has_errors() && !self.diagnostics.has_warnings()
    }

    /// Returns true if malformed-source diagnostics were reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Returns the dictionary only if no errors were reported.
    ///
    /// # Errors
    /// Returns [`IddError::Malformed`](ironidd_core::IddError::Malformed) with
    /// the error diagnostics.
    pub fn into_strict(self) -> Result<Dictionary> {
        let errors: Vec<Diagnostic> = self.diagnostics.errors().cloned().collect();
        if errors.is_empty() {
            Ok(self.dictionary)
        } else {
            Err(MalformedDictionary {
                diagnostics: errors,
            }
            .into())
        }
    }

    /// Returns the dictionary only if no errors or warnings were reported.
    ///
    /// # Errors
    /// Returns [`IddError::Malformed`](ironidd_core::IddError::Malformed) with
    /// the error and warning diagnostics.
    pub fn into_strict_with_warnings(self) -> Result<Dictionary> {
        let problems: Vec<Diagnostic> = self
            .diagnostics
            .iter()
            .filter(|d| d.severity >= ironidd_core::Severity::Warning)
            .cloned()
            .collect();
        if problems.is_empty() {
            Ok(self.dictionary)
        } else {
            Err(MalformedDictionary {
                diagnostics: problems,
            }
            .into())
        }
    }
}

/// Dictionary parser with its configuration and source loader.
#[derive(Clone, Copy)]
pub struct DictionaryParser<'a> {
    config: &'a ParserConfig,
    loader: Option<&'a dyn SourceLoader>,
}

static DEFAULT_CONFIG: ParserConfig = ParserConfig {
    source_name: None,
    max_include_depth: crate::config::DEFAULT_MAX_INCLUDE_DEPTH,
    resolve_includes: true,
    insert_comment_only_object: false,
};

impl Default for DictionaryParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DictionaryParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryParser")
            .field("config", self.config)
            .field("loader", &self.loader.is_some())
            .finish()
    }
}

impl<'a> DictionaryParser<'a> {
    /// Creates a parser with the default configuration and no loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: &DEFAULT_CONFIG,
            loader: None,
        }
    }

    /// Uses the given configuration.
    #[must_use]
    pub const fn with_config(mut self, config: &'a ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves `\include-file` directives through the given loader.
    #[must_use]
    pub fn with_loader(mut self, loader: &'a dyn SourceLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        self.config
    }

    /// Parses dictionary text.
    ///
    /// # Arguments
    /// * `text` - The full dictionary text
    #[must_use]
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let source = self.config.source_name.as_deref();
        debug!(source = source.unwrap_or(ANONYMOUS_SOURCE), bytes = text.len(), "parsing dictionary");

        let parsed = parse_source(text, source);
        let mut diagnostics = Diagnostics::new();
        let mut resolver = Resolver::new(
            self.loader,
            self.config,
            source.unwrap_or(ANONYMOUS_SOURCE),
        );
        let resolved = resolver.resolve(parsed, &mut diagnostics);
        let dictionary = assemble(resolved, self.config, &mut diagnostics);

        ParseOutcome {
            dictionary,
            diagnostics,
        }
    }

    /// Loads a named source through the loader and parses it.
    ///
    /// The source name labels diagnostics unless the configuration names the
    /// root source explicitly.
    ///
    /// # Arguments
    /// * `name` - Source name understood by the loader
    ///
    /// # Errors
    /// Returns an error if no loader is set or the root source cannot be
    /// loaded. Problems inside the dictionary are reported as diagnostics.
    pub fn load(&self, name: &str) -> Result<ParseOutcome> {
        let loader = self.loader.ok_or_else(|| SourceError::NotFound {
            name: name.to_string(),
        })?;
        let text = loader.load(name)?;

        if self.config.source_name.is_some() {
            return Ok(self.parse(&text));
        }
        let config = self.config.clone().with_source_name(name);
        Ok(DictionaryParser {
            config: &config,
            loader: self.loader,
        }
        .parse(&text))
    }
}

/// Parses dictionary text with the default configuration.
///
/// Includes are not followed since no loader is available.
///
/// # Arguments
/// * `text` - The full dictionary text
#[must_use]
pub fn parse_str(text: &str) -> ParseOutcome {
    DictionaryParser::new().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironidd_core::diagnostic::DiagnosticKind;
    use ironidd_core::error::IddError;
    use std::collections::HashMap;

    struct Sources(HashMap<&'static str, &'static str>);

    impl SourceLoader for Sources {
        fn load(&self, name: &str) -> std::result::Result<String, SourceError> {
            self.0
                .get(name)
                .map(|text| (*text).to_string())
                .ok_or_else(|| SourceError::NotFound {
                    name: name.to_string(),
                })
        }
    }

    #[test]
    fn test_parse_str_clean() {
        let outcome = parse_str("Foo,\n  A1; \\field Name\n");
        assert!(outcome.is_clean());
        assert!(outcome.into_strict().is_ok());
    }

    #[test]
    fn test_into_strict_reports_errors() {
        let outcome = parse_str("Good;\nBroken,\n  A1, \\field Name\n");
        assert_eq!(outcome.dictionary.len(), 1);
        let err = outcome.into_strict().unwrap_err();
        match err {
            IddError::Malformed(malformed) => {
                assert_eq!(malformed.diagnostics.len(), 1);
                assert_eq!(malformed.diagnostics[0].kind, DiagnosticKind::UnterminatedObject);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_with_warnings() {
        let outcome = parse_str("Obj,\n  \\min-fields 4\n  A1; \\field Name\n");
        assert!(!outcome.has_errors());
        assert!(!outcome.is_clean());
        assert!(outcome.clone().into_strict().is_ok());
        assert!(outcome.into_strict_with_warnings().is_err());
    }

    #[test]
    fn test_load_labels_diagnostics_with_source() {
        let sources = Sources(HashMap::from([("main.idd", "Broken,\n  A1, \\field Name\n")]));
        let outcome = DictionaryParser::new()
            .with_loader(&sources)
            .load("main.idd")
            .unwrap();
        let error = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(error.location.source.as_deref(), Some("main.idd"));
        assert_eq!(error.location.line, 1);
    }

    #[test]
    fn test_load_without_loader() {
        let err = DictionaryParser::new().load("main.idd").unwrap_err();
        assert!(matches!(err, IddError::Source(SourceError::NotFound { .. })));
    }

    #[test]
    fn test_load_detects_self_include() {
        let sources = Sources(HashMap::from([("main.idd", "Foo;\n\\include-file main.idd\n")]));
        let outcome = DictionaryParser::new()
            .with_loader(&sources)
            .load("main.idd")
            .unwrap();
        assert_eq!(outcome.dictionary.len(), 1);
        assert_eq!(
            outcome.diagnostics.of_kind(DiagnosticKind::IncludeCycle).count(),
            1
        );
    }

    #[test]
    fn test_custom_config() {
        let config = ParserConfig::new()
            .with_source_name("custom.idd")
            .with_comment_only_object(true);
        let outcome = DictionaryParser::new().with_config(&config).parse("Foo;\n");
        assert_eq!(outcome.dictionary.len(), 2);
        assert!(outcome.dictionary.contains("commentonly"));
    }
}
