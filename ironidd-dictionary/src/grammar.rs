/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Directive grammar table.
//!
//! Every backslash directive is matched against an ordered, per-scope rule
//! table. The table is compiled once on first use and shared by reference.
//!
//! Keyword case handling is decided per keyword and must not be normalized:
//! most keywords tolerate a different case only where the pattern lists an
//! alternative (`[mM]emo` accepts `Memo` and `memo` but not `MEMO`), while
//! `type` and `url-object` ignore case entirely.

use once_cell::sync::Lazy;
use regex::Regex;

/// Parser state a directive is classified in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Outside any object; only file-level directives apply.
    File,
    /// Between an object name and its first field.
    Object,
    /// After a field declaration.
    Field,
}

/// Recognized directive keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    // File scope
    /// `\group <name>`
    Group,
    /// `\include-file <name>`
    IncludeFile,
    /// `\remove-object <name>`
    RemoveObject,

    // Object scope
    /// `\memo <text>`
    Memo,
    /// `\note <text>` (object and field scope)
    Note,
    /// `\unique-object`
    UniqueObject,
    /// `\required-object`
    RequiredObject,
    /// `\obsolete <reason>`
    Obsolete,
    /// `\url-object`
    UrlObject,
    /// `\extensible:<N>`
    Extensible,
    /// `\format <text>`
    Format,
    /// `\min-fields <N>`
    MinFields,
    /// `\max-fields <N>`
    MaxFields,
    /// `\begin-extensible` (object and field scope)
    BeginExtensible,

    // Field scope
    /// `\field <name>`
    Field,
    /// `\required-field`
    RequiredField,
    /// `\autosizable`
    Autosizable,
    /// `\autocalculatable`
    Autocalculatable,
    /// `\retaincase`
    Retaincase,
    /// `\unitsBasedOnField <A#|N#>`
    UnitsBasedOnField,
    /// `\units <text>`
    Units,
    /// `\ip-units <text>`
    IpUnits,
    /// `\minimum> <value>`
    MinimumExclusive,
    /// `\minimum <value>`
    MinimumInclusive,
    /// `\maximum< <value>`
    MaximumExclusive,
    /// `\maximum <value>`
    MaximumInclusive,
    /// `\deprecated <reason>`
    Deprecated,
    /// `\default <value>`
    Default,
    /// `\type <kind>`
    Type,
    /// `\key <value>`
    Key,
    /// `\object-list <name>`
    ObjectList,
    /// `\external-list <name>`
    ExternalList,
    /// `\reference-class-name <name>`
    ReferenceClassName,
    /// `\reference <name>`
    Reference,
}

impl DirectiveKind {
    /// Returns true for directives that are only valid outside objects.
    #[must_use]
    pub const fn is_file_scope(&self) -> bool {
        matches!(self, Self::Group | Self::IncludeFile | Self::RemoveObject)
    }
}

/// A classified directive and its trimmed argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Which keyword matched.
    pub kind: DirectiveKind,
    /// Argument text, empty for flag directives.
    pub argument: String,
}

/// Sentinel detected in a `\default` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// `autosize` appeared in the text.
    Autosize,
    /// `autocalculate` appeared in the text.
    Autocalculate,
}

#[derive(Debug)]
struct Rule {
    kind: DirectiveKind,
    pattern: Regex,
}

/// Compiled grammar table.
#[derive(Debug)]
pub struct Grammar {
    file: Vec<Rule>,
    object: Vec<Rule>,
    field: Vec<Rule>,
    version: Regex,
    build: Regex,
    automatic_default: Regex,
    version_object: Regex,
}

static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::compile);

fn rule(kind: DirectiveKind, pattern: &str) -> Rule {
    Rule {
        kind,
        pattern: Regex::new(pattern).expect("grammar pattern is valid"),
    }
}

impl Grammar {
    /// Returns the shared grammar table.
    #[must_use]
    pub fn get() -> &'static Self {
        &GRAMMAR
    }

    fn compile() -> Self {
        use DirectiveKind as K;

        // Order matters wherever one keyword is a prefix of another.
        let file = vec![
            rule(K::Group, r"^[gG]roup(.*)"),
            rule(K::IncludeFile, r"^[iI]nclude-[fF]ile(.*)"),
            rule(K::RemoveObject, r"^[rR]emove-[oO]bject(.*)"),
        ];

        let object = vec![
            rule(K::Memo, r"^[mM]emo(.*)"),
            rule(K::Note, r"^[nN]ote(.*)"),
            rule(K::UniqueObject, r"^[uU]nique-[oO]bject"),
            rule(K::RequiredObject, r"^[rR]equired-[oO]bject"),
            rule(K::Obsolete, r"^[oO]bsolete(.*)"),
            rule(K::UrlObject, r"(?i)^url-object"),
            rule(K::Extensible, r"^[eE]xtensible\s*:\s*([1-9][0-9]*)"),
            rule(K::Format, r"^[fF]ormat([^!]*)"),
            rule(K::MinFields, r"^[mM]in-[fF]ields\s*([0-9]+)"),
            rule(K::MaxFields, r"^[mM]ax-[fF]ields\s*([0-9]+)"),
            rule(K::BeginExtensible, r"^[bB]egin-[eE]xtensible"),
        ];

        let field = vec![
            rule(K::Field, r"^[fF]ield([^!]*)"),
            rule(K::RequiredField, r"^[rR]equired-[fF]ield"),
            rule(K::Autosizable, r"^[aA]utosizable"),
            rule(K::Autocalculatable, r"^[aA]utocalculatable"),
            rule(K::Retaincase, r"^[rR]etaincase"),
            rule(K::UnitsBasedOnField, r"^[uU]nits[bB]ased[oO]n[fF]ield([^!]*)"),
            rule(K::Units, r"^[uU]nits([^!]*)"),
            rule(K::IpUnits, r"^[iI][pP]-[uU]nits([^!]*)"),
            rule(K::MinimumExclusive, r"^[mM]inimum\s*>([^!]*)"),
            rule(K::MinimumInclusive, r"^[mM]inimum([^>!]*)"),
            rule(K::MaximumExclusive, r"^[mM]aximum\s*<([^!]*)"),
            rule(K::MaximumInclusive, r"^[mM]aximum([^<!]*)"),
            rule(K::Deprecated, r"^[dD]eprecated(.*)"),
            rule(K::Default, r"^[dD]efault([^!]*)"),
            rule(
                K::Type,
                r"(?i)^type\s*(integer|real|alpha|choice|node|object-list|external-list|url|handle)",
            ),
            rule(K::Key, r"^[kK]ey(.*)"),
            rule(K::ObjectList, r"^[oO]bject-[lL]ist([^!]*)"),
            rule(K::ExternalList, r"^[eE]xternal-[lL]ist([^!]*)"),
            rule(K::ReferenceClassName, r"^[rR]eference-[cC]lass-[nN]ame([^!]*)"),
            rule(K::Reference, r"^[rR]eference([^!]*)"),
            rule(K::Note, r"^[nN]ote(.*)"),
            rule(K::BeginExtensible, r"^[bB]egin-[eE]xtensible"),
        ];

        Self {
            file,
            object,
            field,
            version: Regex::new(r"^!IDD_Version ([0-9.]+)").expect("grammar pattern is valid"),
            build: Regex::new(r"^!IDD_BUILD (\S+)").expect("grammar pattern is valid"),
            automatic_default: Regex::new(r"(?i).*(autocalculate|autosize).*")
                .expect("grammar pattern is valid"),
            version_object: Regex::new(r"[vV]ersion").expect("grammar pattern is valid"),
        }
    }

    /// Classifies directive text (without its leading backslash) in a scope.
    ///
    /// File-level directives are recognized in every scope. Returns `None`
    /// for keywords that are not part of the scope's table.
    ///
    /// # Arguments
    /// * `scope` - The parser state the directive appears in
    /// * `text` - Directive text following the backslash
    #[must_use]
    pub fn classify(&self, scope: Scope, text: &str) -> Option<Directive> {
        let text = text.trim_start();
        let scoped: &[Rule] = match scope {
            Scope::File => &[],
            Scope::Object => &self.object,
            Scope::Field => &self.field,
        };
        self.file.iter().chain(scoped).find_map(|rule| {
            rule.pattern.captures(text).map(|caps| Directive {
                kind: rule.kind,
                argument: caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default(),
            })
        })
    }

    /// Returns true if the text would be recognized in object or field scope.
    #[must_use]
    pub fn is_known_keyword(&self, text: &str) -> bool {
        let text = text.trim_start();
        self.object
            .iter()
            .chain(&self.field)
            .any(|rule| rule.pattern.is_match(text))
    }

    /// Extracts the version from an `!IDD_Version` header line.
    #[must_use]
    pub fn header_version<'t>(&self, line: &'t str) -> Option<&'t str> {
        self.version
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Extracts the build identifier from an `!IDD_BUILD` header line.
    #[must_use]
    pub fn header_build<'t>(&self, line: &'t str) -> Option<&'t str> {
        self.build
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Detects an autosize or autocalculate sentinel anywhere in a default.
    ///
    /// Matching is by substring and ignores case, so `autosizeThenSome` is
    /// the autosize sentinel. When both words appear the last one wins.
    #[must_use]
    pub fn default_sentinel(&self, text: &str) -> Option<Sentinel> {
        let caps = self.automatic_default.captures(text)?;
        let word = caps.get(1)?.as_str();
        if word.eq_ignore_ascii_case("autosize") {
            Some(Sentinel::Autosize)
        } else {
            Some(Sentinel::Autocalculate)
        }
    }

    /// Returns true if an object name marks the version object.
    #[must_use]
    pub fn is_version_object_name(&self, name: &str) -> bool {
        self.version_object.is_match(name)
    }
}
