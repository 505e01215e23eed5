/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Include/remove resolution.
//!
//! `\include-file` directives are followed through a [`SourceLoader`]. The
//! included objects are merged at the position of the directive, minus the
//! objects named by the `\remove-object` directives that follow it.

use crate::config::ParserConfig;
use crate::parser::{IncludeDirective, Item, ParsedObject, ParsedSource, parse_source, record};
use crate::schema::lookup_key;
use crate::token::Header;
use ironidd_core::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, SourceLocation};
use ironidd_core::error::SourceError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Supplies the text of named dictionary sources.
pub trait SourceLoader: Send + Sync {
    /// Loads the full text of a source.
    ///
    /// # Arguments
    /// * `name` - Source name as written after `\include-file`
    ///
    /// # Errors
    /// Returns an error if the source does not exist or cannot be read.
    fn load(&self, name: &str) -> Result<String, SourceError>;
}

impl<T: SourceLoader + ?Sized> SourceLoader for &T {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        (**self).load(name)
    }
}

impl<T: SourceLoader + ?Sized> SourceLoader for Box<T> {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        (**self).load(name)
    }
}

impl<T: SourceLoader + ?Sized> SourceLoader for Arc<T> {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        (**self).load(name)
    }
}

/// A source with all of its includes merged in.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub header: Header,
    pub groups: Vec<String>,
    pub objects: Vec<ParsedObject>,
}

/// Recursive include resolver.
pub(crate) struct Resolver<'a> {
    loader: Option<&'a dyn SourceLoader>,
    config: &'a ParserConfig,
    chain: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(loader: Option<&'a dyn SourceLoader>, config: &'a ParserConfig, root: &str) -> Self {
        Self {
            loader,
            config,
            chain: vec![root.to_string()],
        }
    }

    fn current_source(&self) -> Option<&str> {
        if self.chain.len() > 1 {
            self.chain.last().map(String::as_str)
        } else {
            self.config.source_name.as_deref()
        }
    }

    /// Merges every include of a parsed source, recursively.
    pub fn resolve(&mut self, parsed: ParsedSource, diagnostics: &mut Diagnostics) -> Resolved {
        diagnostics.extend(parsed.diagnostics);

        let own: HashSet<String> = parsed
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Object(object) => Some(lookup_key(&object.def.name)),
                Item::Include(_) | Item::Group(_) => None,
            })
            .collect();

        let mut merge = Merge {
            own,
            taken: HashSet::new(),
            groups: Vec::new(),
            objects: Vec::new(),
        };

        for item in parsed.items {
            match item {
                Item::Object(object) => {
                    merge.taken.insert(lookup_key(&object.def.name));
                    merge.objects.push(object);
                }
                Item::Include(include) => self.include(include, &mut merge, diagnostics),
                Item::Group(name) => merge.add_group(name),
            }
        }

        Resolved {
            header: parsed.header,
            groups: merge.groups,
            objects: merge.objects,
        }
    }

    fn include(&mut self, include: IncludeDirective, merge: &mut Merge, diagnostics: &mut Diagnostics) {
        let location = SourceLocation::new(self.current_source(), include.line);

        if !self.config.resolve_includes {
            record(
                diagnostics,
                Diagnostic::info(
                    DiagnosticKind::IncludeSkipped,
                    location,
                    format!("include of {} skipped by configuration", include.source),
                ),
            );
            return;
        }
        let Some(loader) = self.loader else {
            record(
                diagnostics,
                Diagnostic::info(
                    DiagnosticKind::IncludeSkipped,
                    location,
                    format!("include of {} skipped, no source loader", include.source),
                ),
            );
            return;
        };

        if self.chain.contains(&include.source) {
            let mut chain = self.chain.clone();
            chain.push(include.source.clone());
            let err = SourceError::IncludeCycle { chain };
            record(
                diagnostics,
                Diagnostic::error(DiagnosticKind::IncludeCycle, location, err.to_string()),
            );
            return;
        }
        if self.chain.len() > self.config.max_include_depth {
            let err = SourceError::IncludeDepthExceeded {
                name: include.source.clone(),
                depth: self.config.max_include_depth,
            };
            record(
                diagnostics,
                Diagnostic::error(DiagnosticKind::IncludeFailed, location, err.to_string()),
            );
            return;
        }

        let text = match loader.load(&include.source) {
            Ok(text) => text,
            Err(err) => {
                record(
                    diagnostics,
                    Diagnostic::error(DiagnosticKind::IncludeFailed, location, err.to_string()),
                );
                return;
            }
        };

        self.chain.push(include.source.clone());
        let parsed = parse_source(&text, Some(&include.source));
        let included = self.resolve(parsed, diagnostics);
        self.chain.pop();

        let removed: HashSet<String> = include.removed.iter().map(|n| lookup_key(n)).collect();
        for name in &include.removed {
            let key = lookup_key(name);
            if !included.objects.iter().any(|o| lookup_key(&o.def.name) == key) {
                record(
                    diagnostics,
                    Diagnostic::warning(
                        DiagnosticKind::UnknownRemoval,
                        location.clone(),
                        format!("{} does not define {name}", include.source),
                    ),
                );
            }
        }

        let mut merged = 0usize;
        for object in included.objects {
            let key = lookup_key(&object.def.name);
            if removed.contains(&key) {
                continue;
            }
            if merge.own.contains(&key) || merge.taken.contains(&key) {
                record(
                    diagnostics,
                    Diagnostic::error(
                        DiagnosticKind::MergeConflict,
                        location.clone(),
                        format!(
                            "object {} from {} is already defined",
                            object.def.name, include.source
                        ),
                    ),
                );
                continue;
            }
            merge.taken.insert(key);
            merge.objects.push(object);
            merged += 1;
        }

        for group in included.groups {
            merge.add_group(group);
        }

        debug!(
            source = %include.source,
            merged,
            removed = include.removed.len(),
            "merged included dictionary"
        );
    }
}

struct Merge {
    own: HashSet<String>,
    taken: HashSet<String>,
    groups: Vec<String>,
    objects: Vec<ParsedObject>,
}

impl Merge {
    fn add_group(&mut self, name: String) {
        if !self.groups.contains(&name) {
            self.groups.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Sources(HashMap<&'static str, &'static str>);

    impl SourceLoader for Sources {
        fn load(&self, name: &str) -> Result<String, SourceError> {
            self.0
                .get(name)
                .map(|text| (*text).to_string())
                .ok_or_else(|| SourceError::NotFound {
                    name: name.to_string(),
                })
        }
    }

    fn resolve(root: &str, sources: &Sources, config: &ParserConfig) -> (Vec<String>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut resolver = Resolver::new(Some(sources), config, "root.idd");
        let resolved = resolver.resolve(parse_source(root, Some("root.idd")), &mut diagnostics);
        let names = resolved.objects.into_iter().map(|o| o.def.name).collect();
        (names, diagnostics)
    }

    #[test]
    fn test_include_merges_at_position() {
        let sources = Sources(HashMap::from([("base.idd", "Foo;\nBar;\n")]));
        let (names, diagnostics) = resolve(
            "First;\n\\include-file base.idd\nLast;\n",
            &sources,
            &ParserConfig::new(),
        );
        assert_eq!(names, vec!["First", "Foo", "Bar", "Last"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_remove_object() {
        let sources = Sources(HashMap::from([("base.idd", "Foo;\nBar;\n")]));
        let (names, diagnostics) = resolve(
            "\\include-file base.idd\n\\remove-object Foo\nLocal;\n",
            &sources,
            &ParserConfig::new(),
        );
        assert_eq!(names, vec!["Bar", "Local"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_remove_unknown_object_warns() {
        let sources = Sources(HashMap::from([("base.idd", "Foo;\n")]));
        let (names, diagnostics) = resolve(
            "\\include-file base.idd\n\\remove-object Missing\n",
            &sources,
            &ParserConfig::new(),
        );
        assert_eq!(names, vec!["Foo"]);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnknownRemoval).count(), 1);
    }

    #[test]
    fn test_merge_conflict_keeps_own_definition() {
        let sources = Sources(HashMap::from([("base.idd", "Foo,\n  A1; \\field Theirs\n")]));
        let mut diagnostics = Diagnostics::new();
        let config = ParserConfig::new();
        let mut resolver = Resolver::new(Some(&sources), &config, "root.idd");
        let resolved = resolver.resolve(
            parse_source("\\include-file base.idd\nFOO,\n  A1; \\field Ours\n", None),
            &mut diagnostics,
        );
        assert_eq!(resolved.objects.len(), 1);
        assert_eq!(resolved.objects[0].def.fields[0].name, "Ours");
        assert_eq!(diagnostics.of_kind(DiagnosticKind::MergeConflict).count(), 1);
    }

    #[test]
    fn test_include_cycle() {
        let sources = Sources(HashMap::from([
            ("a.idd", "A;\n\\include-file b.idd\n"),
            ("b.idd", "B;\n\\include-file a.idd\n"),
        ]));
        let (names, diagnostics) =
            resolve("\\include-file a.idd\n", &sources, &ParserConfig::new());
        assert_eq!(names, vec!["A", "B"]);
        let cycle: Vec<_> = diagnostics.of_kind(DiagnosticKind::IncludeCycle).collect();
        assert_eq!(cycle.len(), 1);
        assert!(cycle[0].message.contains("a.idd -> b.idd -> a.idd"));
        assert_eq!(cycle[0].location.source.as_deref(), Some("b.idd"));
    }

    #[test]
    fn test_missing_include() {
        let sources = Sources(HashMap::new());
        let (names, diagnostics) = resolve(
            "Local;\n\\include-file nowhere.idd\n",
            &sources,
            &ParserConfig::new(),
        );
        assert_eq!(names, vec!["Local"]);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::IncludeFailed).count(), 1);
    }

    #[test]
    fn test_include_depth_limit() {
        let sources = Sources(HashMap::from([
            ("a.idd", "A;\n\\include-file b.idd\n"),
            ("b.idd", "B;\n"),
        ]));
        let config = ParserConfig::new().with_max_include_depth(1);
        let (names, diagnostics) = resolve("\\include-file a.idd\n", &sources, &config);
        assert_eq!(names, vec!["A"]);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::IncludeFailed).count(), 1);
    }

    #[test]
    fn test_includes_disabled() {
        let sources = Sources(HashMap::from([("base.idd", "Foo;\n")]));
        let config = ParserConfig::new().with_resolve_includes(false);
        let (names, diagnostics) = resolve("\\include-file base.idd\nLocal;\n", &sources, &config);
        assert_eq!(names, vec!["Local"]);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::IncludeSkipped).count(), 1);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_included_groups_keep_position() {
        let sources = Sources(HashMap::from([(
            "base.idd",
            "\\group Shared\nFoo;\n\\group Local\nBar;\n",
        )]));
        let mut diagnostics = Diagnostics::new();
        let config = ParserConfig::new();
        let mut resolver = Resolver::new(Some(&sources), &config, "root.idd");
        let resolved = resolver.resolve(
            parse_source("\\group Local\nMine;\n\\include-file base.idd\n", None),
            &mut diagnostics,
        );
        assert_eq!(resolved.groups, vec!["Local", "Shared"]);

        let mut diagnostics = Diagnostics::new();
        let resolved = resolver.resolve(
            parse_source("\\include-file base.idd\n\\group Mine\nLast;\n", None),
            &mut diagnostics,
        );
        assert_eq!(resolved.groups, vec!["Shared", "Local", "Mine"]);
        assert_eq!(resolved.objects[0].def.group.as_deref(), Some("Shared"));
        assert_eq!(resolved.objects[1].def.group.as_deref(), Some("Local"));
        assert_eq!(resolved.objects[1].source.as_deref(), Some("base.idd"));
        assert_eq!(resolved.objects[2].def.group.as_deref(), Some("Mine"));
    }
}
