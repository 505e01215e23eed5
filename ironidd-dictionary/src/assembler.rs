/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema assembler.
//!
//! Runs the whole-object checks that need every field to be known, then
//! freezes the resolved objects into a [`Dictionary`].

use crate::config::{COMMENT_ONLY_OBJECT_NAME, COMMENT_ONLY_OBJECT_TEXT, ParserConfig};
use crate::include::Resolved;
use crate::parser::{Item, ParsedObject, parse_source, record};
use crate::schema::Dictionary;
use ironidd_core::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, SourceLocation};
use tracing::info;

/// Builds the final dictionary.
pub(crate) fn assemble(
    resolved: Resolved,
    config: &ParserConfig,
    diagnostics: &mut Diagnostics,
) -> Dictionary {
    let mut objects = resolved.objects;

    if config.insert_comment_only_object
        && !objects
            .iter()
            .any(|o| o.def.name.eq_ignore_ascii_case(COMMENT_ONLY_OBJECT_NAME))
    {
        if let Some(comment_only) = comment_only_object() {
            objects.insert(0, comment_only);
        }
    }

    for object in &mut objects {
        number_fields(object);
        check_object(object, diagnostics);
    }

    let header = resolved.header;
    let dictionary = Dictionary::new(
        header.version,
        header.build,
        header.text,
        resolved.groups,
        objects.into_iter().map(|o| o.def).collect(),
    );

    info!(
        objects = dictionary.len(),
        groups = dictionary.groups().len(),
        version = dictionary.version().unwrap_or("unknown"),
        errors = diagnostics.errors().count(),
        warnings = diagnostics.warnings().count(),
        "assembled dictionary"
    );
    dictionary
}

fn comment_only_object() -> Option<ParsedObject> {
    parse_source(COMMENT_ONLY_OBJECT_TEXT, None)
        .items
        .into_iter()
        .find_map(|item| match item {
            Item::Object(object) => Some(object),
            Item::Include(_) | Item::Group(_) => None,
        })
}

fn number_fields(object: &mut ParsedObject) {
    let fields = &mut object.def.fields;
    let last = fields.len().saturating_sub(1);
    for (i, field) in fields.iter_mut().enumerate() {
        field.index = i;
        field.is_last = i == last;
    }
}

fn check_object(object: &ParsedObject, diagnostics: &mut Diagnostics) {
    let def = &object.def;
    let location = SourceLocation::new(object.source.as_deref(), object.line);
    let count = def.fields.len();

    if let Some(min_fields) = def.min_fields {
        if min_fields > count {
            record(
                diagnostics,
                Diagnostic::warning(
                    DiagnosticKind::MinFieldsExceedsFieldCount,
                    location.clone(),
                    format!(
                        "{} declares min-fields {min_fields} but has {count} fields",
                        def.name
                    ),
                ),
            );
        }
    }

    let marker = def.fields.iter().position(|f| f.begin_extensible);
    let problem = match (def.extensible, marker) {
        (Some(size), _) if count < size => Some(format!(
            "{} declares extensible:{size} but has {count} fields",
            def.name
        )),
        (Some(size), Some(start)) if (count - start) % size != 0 || count - start < size => {
            Some(format!(
                "{} has {} fields from begin-extensible, not a multiple of {size}",
                def.name,
                count - start
            ))
        }
        (None, Some(_)) => Some(format!(
            "{} marks begin-extensible without extensible:N",
            def.name
        )),
        _ => None,
    };
    if let Some(message) = problem {
        record(
            diagnostics,
            Diagnostic::warning(DiagnosticKind::ExtensibleMismatch, location, message),
        );
    }
}
