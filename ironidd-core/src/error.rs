/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the IronIdd dictionary toolkit.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors. Dictionary *content* problems are not errors here:
//! they are collected as [`Diagnostic`](crate::diagnostic::Diagnostic)s and
//! only become [`IddError::Malformed`] when a caller asks for a strict result.

use crate::diagnostic::Diagnostic;
use thiserror::Error;

/// Result type alias using [`IddError`] as the error type.
pub type Result<T> = std::result::Result<T, IddError>;

/// Top-level error type for all IronIdd operations.
#[derive(Debug, Error)]
pub enum IddError {
    /// A dictionary source could not be supplied.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The dictionary contained malformed-source (or, in strict mode, warning) diagnostics.
    #[error("malformed dictionary: {0}")]
    Malformed(#[from] MalformedDictionary),

    /// A value failed validation against a field definition.
    #[error("invalid value: {0}")]
    Value(#[from] ValueError),
}

/// Errors raised while supplying raw dictionary text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No source is registered under the requested name.
    #[error("dictionary source not found: {name}")]
    NotFound {
        /// The requested source name.
        name: String,
    },

    /// The source exists but could not be read.
    #[error("dictionary source {name} unreadable: {reason}")]
    Unreadable {
        /// The requested source name.
        name: String,
        /// Description of the failure.
        reason: String,
    },

    /// A source includes itself, directly or transitively.
    #[error("include cycle: {}", chain.join(" -> "))]
    IncludeCycle {
        /// Source names from the root to the repeated source.
        chain: Vec<String>,
    },

    /// The include chain is deeper than the configured limit.
    #[error("include depth {depth} exceeded while loading {name}")]
    IncludeDepthExceeded {
        /// The source that would have exceeded the limit.
        name: String,
        /// The configured maximum depth.
        depth: usize,
    },
}

/// Reasons a value is rejected by a field definition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// The field is required but the value is empty.
    #[error("field {field} is required")]
    Required {
        /// Field name.
        field: String,
    },

    /// The field is an integer field and the value does not parse as one.
    #[error("field {field} expects an integer, got {value:?}")]
    NotAnInteger {
        /// Field name.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// The field is numeric and the value does not parse as a number.
    #[error("field {field} expects a number, got {value:?}")]
    NotANumber {
        /// Field name.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// The value is below the field minimum.
    #[error("field {field} value {value} is below minimum {bound}")]
    BelowMinimum {
        /// Field name.
        field: String,
        /// The rejected value.
        value: f64,
        /// Rendered bound, e.g. `>0` or `0`.
        bound: String,
    },

    /// The value is above the field maximum.
    #[error("field {field} value {value} is above maximum {bound}")]
    AboveMaximum {
        /// Field name.
        field: String,
        /// The rejected value.
        value: f64,
        /// Rendered bound, e.g. `<100` or `100`.
        bound: String,
    },

    /// The value is not one of the field's keys.
    #[error("field {field} does not accept {value:?}")]
    NotAKey {
        /// Field name.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// `autosize` given for a field that is not autosizable.
    #[error("field {field} is not autosizable")]
    AutosizeNotAllowed {
        /// Field name.
        field: String,
    },

    /// `autocalculate` given for a field that is not autocalculatable.
    #[error("field {field} is not autocalculatable")]
    AutocalculateNotAllowed {
        /// Field name.
        field: String,
    },
}

/// The diagnostics that made a strict parse fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{} problem(s), first: {}", diagnostics.len(), first_message(diagnostics))]
pub struct MalformedDictionary {
    /// Offending diagnostics, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
