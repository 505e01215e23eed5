/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronIdd
//!
//! An Input Data Dictionary (IDD) parser and schema toolkit for Rust.
//!
//! IronIdd reads the plain-text dictionaries that describe the objects and
//! fields of building-energy model files, and turns them into an immutable,
//! queryable schema.
//!
//! ## Features
//!
//! - **Tolerant parsing**: Malformed objects are dropped and reported, the rest of the file still loads
//! - **Positioned diagnostics**: Every problem carries its source and line
//! - **Includes**: `\include-file` / `\remove-object` merging through pluggable loaders
//! - **Shareable**: A frozen [`dictionary::Dictionary`] is safe to read from any thread
//! - **Codegen**: Typed object and field enums from any dictionary
//!
//! ## Quick Start
//!
//! ```rust
//! use ironidd::prelude::*;
//!
//! let sources = MemorySources::new()
//!     .with_source("Energy+.idd", "Version,\n  \\unique-object\n  A1; \\field Version Identifier\n");
//! let cache = DictionaryCache::new(sources);
//!
//! let outcome = cache.get_or_load("Energy+.idd").unwrap();
//! assert!(outcome.is_clean());
//! let version = outcome.dictionary.version_object().unwrap();
//! assert!(version.unique);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Diagnostics, identifiers, and error definitions
//! - [`dictionary`]: Dictionary parsing and schema types
//! - [`store`]: Source loaders and the shared dictionary cache
//! - [`codegen`]: Rust source generation from dictionaries

pub mod core {
    //! Diagnostics, identifiers, and error definitions.
    pub use ironidd_core::*;
}

pub mod dictionary {
    //! Dictionary parsing and schema types.
    pub use ironidd_dictionary::*;
}

pub mod store {
    //! Source loaders and the shared dictionary cache.
    pub use ironidd_store::*;
}

pub mod codegen {
    //! Rust source generation from dictionaries.
    pub use ironidd_codegen::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use ironidd_core::{
        Diagnostic, DiagnosticKind, Diagnostics, FieldId, IddError, Result, Severity,
        SourceError, SourceLocation, Track, ValueError,
    };

    // Dictionary
    pub use ironidd_dictionary::{
        Bound, DefaultValue, Dictionary, DictionaryParser, FieldDef, FieldType, ObjectDef,
        ParseOutcome, ParserConfig, ParserConfigBuilder, SourceLoader, parse_str,
    };

    // Store
    pub use ironidd_store::{DictionaryCache, FileSystemLoader, MemorySources};

    // Codegen
    pub use ironidd_codegen::{CodeGenerator, GeneratorConfig};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let outcome = parse_str("Zone,\n  A1; \\field Name\n");
        assert!(outcome.is_clean());
        let zone = outcome.dictionary.object("Zone").unwrap();
        assert_eq!(zone.field_by_id(FieldId::alpha(1)).unwrap().field_type, FieldType::Alpha);
    }

    #[test]
    fn test_cache_and_codegen() {
        let cache = DictionaryCache::new(MemorySources::new().with_source(
            "base.idd",
            "OS:Zone,\n  A1, \\field Name\n  N1; \\field Multiplier\n      \\type integer\n",
        ));
        let outcome = cache.get_or_load("base.idd").unwrap();
        let code = CodeGenerator::new().generate(&outcome.dictionary);
        assert!(code.contains("OS_Zone,"));
        assert!(code.contains("Multiplier = 1,"));
    }
}
