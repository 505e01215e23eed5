/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronIdd Core
//!
//! Core types and error definitions for the IronIdd dictionary toolkit.
//!
//! This crate provides the building blocks used across all IronIdd crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Diagnostics**: `Diagnostic`, `Severity`, `DiagnosticKind`, `SourceLocation`
//! - **Identifiers**: `Track` and `FieldId` (`A1`, `N2`, ...)

pub mod diagnostic;
pub mod error;
pub mod types;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity, SourceLocation};
pub use error::{IddError, MalformedDictionary, Result, SourceError, ValueError};
pub use types::{FieldId, InvalidFieldId, Track};
