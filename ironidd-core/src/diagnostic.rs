/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Dictionary diagnostics.
//!
//! Parsing a dictionary never stops at the first problem. Every problem is
//! recorded as a [`Diagnostic`] with a [`Severity`]:
//! - [`Severity::Error`]: malformed source; the affected object is dropped
//! - [`Severity::Warning`]: dictionary-authoring problem; parsing continues
//! - [`Severity::Info`]: unrecognized or skipped directives

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational, never fatal.
    Info,
    /// Dictionary-authoring warning.
    Warning,
    /// Malformed source.
    Error,
}

impl Severity {
    /// Returns the lowercase label used in rendered diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// End of input or a new object reached before the closing `;`.
    UnterminatedObject,
    /// A field declares both the inclusive and exclusive form of a bound.
    ConflictingBounds,
    /// Two objects with the same name in one source.
    DuplicateObject,
    /// An included object collides with an existing one and was not removed.
    MergeConflict,
    /// An included source could not be loaded.
    IncludeFailed,
    /// An included source includes itself.
    IncludeCycle,
    /// A field declaration with no object to belong to.
    FieldOutsideObject,
    /// An object or field directive with no object to belong to.
    DirectiveOutsideObject,
    /// Directive keyword not recognized in the current scope.
    UnrecognizedDirective,
    /// The same `\key` value declared twice on one field.
    DuplicateKey,
    /// The same `A#`/`N#` declared twice in one object.
    DuplicateFieldId,
    /// `\min-fields` larger than the number of declared fields.
    MinFieldsExceedsFieldCount,
    /// Extensible group arithmetic does not add up.
    ExtensibleMismatch,
    /// Minimum above maximum.
    InvertedBounds,
    /// A numeric directive argument that is not a number.
    InvalidNumber,
    /// `\remove-object` naming an object the included source does not define.
    UnknownRemoval,
    /// Content that is neither a field nor part of an object header.
    StrayContent,
    /// `autosize`/`autocalculate` default on a field lacking the matching flag.
    SentinelWithoutFlag,
    /// An include directive skipped because include resolution is disabled.
    IncludeSkipped,
}

impl DiagnosticKind {
    /// Returns the kebab-case code used in rendered diagnostics.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnterminatedObject => "unterminated-object",
            Self::ConflictingBounds => "conflicting-bounds",
            Self::DuplicateObject => "duplicate-object",
            Self::MergeConflict => "merge-conflict",
            Self::IncludeFailed => "include-failed",
            Self::IncludeCycle => "include-cycle",
            Self::FieldOutsideObject => "field-outside-object",
            Self::DirectiveOutsideObject => "directive-outside-object",
            Self::UnrecognizedDirective => "unrecognized-directive",
            Self::DuplicateKey => "duplicate-key",
            Self::DuplicateFieldId => "duplicate-field-id",
            Self::MinFieldsExceedsFieldCount => "min-fields-exceeds-field-count",
            Self::ExtensibleMismatch => "extensible-mismatch",
            Self::InvertedBounds => "inverted-bounds",
            Self::InvalidNumber => "invalid-number",
            Self::UnknownRemoval => "unknown-removal",
            Self::StrayContent => "stray-content",
            Self::SentinelWithoutFlag => "sentinel-without-flag",
            Self::IncludeSkipped => "include-skipped",
        }
    }
}

/// Where in which source a diagnostic was raised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source name (file name or loader key), if known.
    pub source: Option<String>,
    /// 1-based line number; 0 when the diagnostic is not tied to a line.
    pub line: usize,
}

impl SourceLocation {
    /// Creates a new source location.
    #[must_use]
    pub fn new(source: Option<&str>, line: usize) -> Self {
        Self {
            source: source.map(str::to_string),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}", source, self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// One problem found in a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Category.
    pub kind: DiagnosticKind,
    /// Where it was found.
    pub location: SourceLocation,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            location,
            message: message.into(),
        }
    }

    /// Creates an error-severity diagnostic.
    #[must_use]
    pub fn error(kind: DiagnosticKind, location: SourceLocation, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, location, message)
    }

    /// Creates a warning-severity diagnostic.
    #[must_use]
    pub fn warning(
        kind: DiagnosticKind,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, kind, location, message)
    }

    /// Creates an info-severity diagnostic.
    #[must_use]
    pub fn info(kind: DiagnosticKind, location: SourceLocation, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, kind, location, message)
    }

    /// Returns true for error severity.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity,
            self.kind.code(),
            self.location,
            self.message
        )
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Appends every diagnostic from `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Returns an iterator over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }

    /// Returns an iterator over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Returns an iterator over diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.kind == kind)
    }

    /// Returns true if any error-severity diagnostic was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Returns true if any warning-severity diagnostic was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no diagnostic was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the collection, returning the diagnostics in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
