/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronIdd Dictionary
//!
//! Input Data Dictionary parsing and schema management for IronIdd.
//!
//! This crate provides:
//! - **Tokenizer**: Line splitter, comment stripper and header extraction
//! - **Grammar**: Directive classification table with per-keyword case rules
//! - **Parser**: Object and field state machine with positioned diagnostics
//! - **Includes**: `\include-file` / `\remove-object` resolution through a [`SourceLoader`]
//! - **Schema**: Frozen [`Dictionary`] with case-insensitive object lookup
//! - **Validation**: Field value checks against bounds, keys and sentinels
//!
//! ## Example
//!
//! ```
//! use ironidd_dictionary::parse_str;
//!
//! let outcome = parse_str("TestObj,\\memo test object;\n  A1,\\field Name;\n");
//! assert!(outcome.is_clean());
//! let object = outcome.dictionary.object("testobj").unwrap();
//! assert_eq!(object.fields.len(), 1);
//! ```

mod assembler;
pub mod config;
pub mod grammar;
pub mod include;
pub mod load;
mod parser;
pub mod schema;
pub mod token;
mod validate;

pub use config::{ParserConfig, ParserConfigBuilder};
pub use include::SourceLoader;
pub use load::{DictionaryParser, ParseOutcome, parse_str};
pub use parser::IncludeDirective;
pub use schema::{Bound, DefaultValue, Dictionary, FieldDef, FieldType, ObjectDef};

#[cfg(test)]
mod tests {
    use super::*;
    use ironidd_core::diagnostic::DiagnosticKind;
    use ironidd_core::error::SourceError;
    use ironidd_core::types::{FieldId, Track};
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

    const BASE: &str = "\
!IDD_Version 2.9.0
!IDD_BUILD 55f8ed4
\\group Simulation Parameters

OS:Version,
      \\unique-object
      \\format singleLine
  A1, \\field Handle
      \\type handle
      \\required-field
  A2 ; \\field Version Identifier
      \\default 2.9.0

\\group Geometry

OS:Space,
      \\min-fields 2
  A1, \\field Handle
      \\type handle
  A2, \\field Name
      \\type alpha
      \\reference SpaceNames
  N1; \\field Multiplier
      \\type integer
      \\minimum 1
      \\default 1

OS:Surface,
      \\extensible:3
  A1, \\field Handle
      \\type handle
  A2, \\field Name
  A3, \\field Surface Type
      \\type choice
      \\key Floor
      \\key Wall
      \\key RoofCeiling
  N1, \\field Vertex 1 X-coordinate
      \\begin-extensible
      \\units m
  N2, \\field Vertex 1 Y-coordinate
      \\units m
  N3; \\field Vertex 1 Z-coordinate
      \\units m
";

    #[test]
    fn test_end_to_end_example() {
        let outcome = parse_str(
            "TestObj,\\memo test object;\n  A1,\\field Name;\n  N1,\\field Value,\\type real,\\minimum 0,\\maximum 100;",
        );
        assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);

        let dictionary = outcome.into_strict().unwrap();
        assert_eq!(dictionary.len(), 1);
        let object = dictionary.object("TestObj").unwrap();
        assert_eq!(object.memo, "test object");
        assert_eq!(object.num_fields(), 2);

        let value = object.field_by_name("value").unwrap();
        assert_eq!(value.id, FieldId::new(Track::Numeric, 1));
        assert_eq!(value.field_type, FieldType::Real);
        assert_eq!(value.minimum, Some(Bound::inclusive(0.0)));
        assert_eq!(value.maximum, Some(Bound::inclusive(100.0)));
        assert!(value.is_last);
        assert!(value.validate("50").is_ok());
        assert!(value.validate("150").is_err());
    }

    #[test]
    fn test_full_dictionary() {
        let outcome = DictionaryParser::new().parse(BASE);
        assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
        let dictionary = outcome.dictionary;

        assert_eq!(dictionary.version(), Some("2.9.0"));
        assert_eq!(dictionary.build(), Some("55f8ed4"));
        assert_eq!(dictionary.groups(), ["Simulation Parameters", "Geometry"]);
        assert_eq!(dictionary.objects_in_group("Geometry").count(), 2);
        assert_eq!(dictionary.unique_objects().count(), 1);
        assert_eq!(dictionary.version_object().unwrap().name, "OS:Version");

        let space = dictionary.object("os:space").unwrap();
        assert_eq!(space.field(2).unwrap().field_type, FieldType::Integer);
        assert_eq!(space.field(1).unwrap().references, vec!["SpaceNames"]);

        let surface = dictionary.object("OS:Surface").unwrap();
        assert_eq!(surface.extensible_prefix_len(), 3);
        assert_eq!(surface.extensible_group().len(), 3);
        assert!(surface.field_by_name("Surface Type").unwrap().has_key("wall"));
    }

    #[test]
    fn test_include_with_removal() {
        let sources = Sources(HashMap::from([("base.idd", BASE)]));
        let text = "\
\\include-file base.idd
\\remove-object OS:Surface

\\group Custom
My:Object,
  A1; \\field Name
";
        let config = ParserConfig::new().with_source_name("custom.idd");
        let outcome = DictionaryParser::new()
            .with_config(&config)
            .with_loader(&sources)
            .parse(text);
        assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);

        let names: Vec<_> = outcome.dictionary.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["OS:Version", "OS:Space", "My:Object"]);
        assert_eq!(
            outcome.dictionary.groups(),
            ["Simulation Parameters", "Geometry", "Custom"]
        );
        // The root header is kept, the included one is not.
        assert_eq!(outcome.dictionary.version(), None);
    }

    #[test]
    fn test_errors_do_not_abort_parse() {
        let text = "\
First,
  A1, \\field Name
Second,
  N1; \\field Value
      \\minimum> 0
      \\minimum 1
Third;
";
        let outcome = parse_str(text);
        let names: Vec<_> = outcome.dictionary.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Third"]);
        let kinds: Vec<_> = outcome.diagnostics.errors().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::UnterminatedObject, DiagnosticKind::ConflictingBounds]
        );
    }

    #[test]
    fn test_dictionary_serde_round_trip_keeps_lookup() {
        let dictionary = parse_str(BASE).dictionary;
        let json = serde_json::to_string(&dictionary).unwrap();
        let restored: Dictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), dictionary.len());
        assert!(restored.contains("os:surface"));
    }
}
