/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Object and field parser.
//!
//! Consumes the token stream of one source and builds object definitions.
//! Directive scope is decided by parser state, never by the directive text:
//! - `TopLevel`: no current object, only file directives apply
//! - `InObjectHeader`: after an object name, object directives apply
//! - `InField`: after an `A#`/`N#` declaration, field directives apply
//!
//! An object ends when the next object name, a file directive, or the end of
//! input is reached. It must have seen a closing `;` by then.

use crate::grammar::{Directive, DirectiveKind, Grammar, Scope, Sentinel};
use crate::schema::{Bound, DefaultValue, FieldDef, ObjectDef, bounds_consistent, lookup_key};
use crate::token::{Header, Separator, TokenKind, tokenize};
use ironidd_core::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, SourceLocation};
use ironidd_core::types::FieldId;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// An `\include-file` directive with its `\remove-object` exclusions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Name of the included source.
    pub source: String,
    /// Objects of the included source to leave out.
    pub removed: Vec<String>,
    /// Line of the `\include-file` directive.
    pub line: usize,
}

/// An object definition with the place it was declared.
#[derive(Debug, Clone)]
pub(crate) struct ParsedObject {
    pub def: ObjectDef,
    pub source: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum Item {
    Object(ParsedObject),
    Include(IncludeDirective),
    Group(String),
}

/// Everything parsed from one source, before includes are resolved.
#[derive(Debug)]
pub(crate) struct ParsedSource {
    pub header: Header,
    pub items: Vec<Item>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    TopLevel,
    InObjectHeader,
    InField,
}

#[derive(Debug, Default, Clone, Copy)]
struct BoundForms {
    inclusive: bool,
    exclusive: bool,
}

#[derive(Debug)]
struct FieldBuilder {
    def: FieldDef,
    line: usize,
    min_forms: BoundForms,
    max_forms: BoundForms,
}

#[derive(Debug)]
struct ObjectBuilder {
    def: ObjectDef,
    line: usize,
    closed: bool,
    failed: bool,
    pending_begin_extensible: bool,
    field: Option<FieldBuilder>,
}

/// Parses one dictionary source. Includes are recorded, not followed.
pub(crate) fn parse_source(text: &str, source: Option<&str>) -> ParsedSource {
    let mut parser = SourceParser::new(source);
    for token in tokenize(text) {
        match token.kind {
            TokenKind::Comment(_) => {}
            TokenKind::Content { text, terminator } => {
                parser.on_content(text, terminator, token.line);
            }
            TokenKind::Directive { text, terminator } => {
                parser.on_directive(&text, terminator, token.line);
            }
        }
    }
    parser.finish(Header::extract(text))
}

struct SourceParser<'a> {
    grammar: &'static Grammar,
    source: Option<&'a str>,
    state: State,
    group: Option<String>,
    items: Vec<Item>,
    names: HashSet<String>,
    current: Option<ObjectBuilder>,
    open_include: bool,
    diagnostics: Diagnostics,
}

impl<'a> SourceParser<'a> {
    fn new(source: Option<&'a str>) -> Self {
        Self {
            grammar: Grammar::get(),
            source,
            state: State::TopLevel,
            group: None,
            items: Vec::new(),
            names: HashSet::new(),
            current: None,
            open_include: false,
            diagnostics: Diagnostics::new(),
        }
    }

    fn at(&self, line: usize) -> SourceLocation {
        SourceLocation::new(self.source, line)
    }

    fn finish(mut self, header: Header) -> ParsedSource {
        self.end_object();
        ParsedSource {
            header,
            items: self.items,
            diagnostics: self.diagnostics,
        }
    }

    fn on_content(&mut self, text: String, terminator: Option<Separator>, line: usize) {
        if let Ok(id) = text.parse::<FieldId>() {
            self.start_field(id, terminator, line);
            return;
        }

        if text.is_empty() {
            if terminator == Some(Separator::Semicolon) {
                if let Some(object) = self.current.as_mut() {
                    object.closed = true;
                }
            }
            return;
        }

        match self.state {
            State::TopLevel => self.start_object(text, terminator, line),
            State::InObjectHeader => {
                let location = self.at(line);
                match self.current.as_mut() {
                    Some(object) if !object.closed => {
                        // Header commentary; the object keeps no fields.
                        record(
                            &mut self.diagnostics,
                            Diagnostic::info(
                                DiagnosticKind::StrayContent,
                                location,
                                format!("{:?} in the header of {} treated as commentary", text, object.def.name),
                            ),
                        );
                        if terminator == Some(Separator::Semicolon) {
                            object.closed = true;
                        }
                    }
                    _ => {
                        self.end_object();
                        self.start_object(text, terminator, line);
                    }
                }
            }
            State::InField => {
                self.end_object();
                self.start_object(text, terminator, line);
            }
        }
    }

    fn on_directive(&mut self, text: &str, terminator: Option<Separator>, line: usize) {
        let scope = match self.state {
            State::TopLevel => Scope::File,
            State::InObjectHeader => Scope::Object,
            State::InField => Scope::Field,
        };

        match self.grammar.classify(scope, text) {
            None => {
                let location = self.at(line);
                if self.current.is_none() && self.grammar.is_known_keyword(text) {
                    record(
                        &mut self.diagnostics,
                        Diagnostic::warning(
                            DiagnosticKind::DirectiveOutsideObject,
                            location,
                            format!("\\{text} appears outside any object"),
                        ),
                    );
                } else {
                    trace!(directive = text, line, "unrecognized directive");
                    record(
                        &mut self.diagnostics,
                        Diagnostic::info(
                            DiagnosticKind::UnrecognizedDirective,
                            location,
                            format!("\\{text} is not recognized here"),
                        ),
                    );
                }
            }
            Some(directive) if directive.kind.is_file_scope() => {
                self.on_file_directive(directive, line);
            }
            Some(directive) => self.apply(scope, directive, line),
        }

        if terminator == Some(Separator::Semicolon) {
            if let Some(object) = self.current.as_mut() {
                object.closed = true;
            }
        }
    }

    fn on_file_directive(&mut self, directive: Directive, line: usize) {
        self.end_object();
        let name = directive.argument;
        match directive.kind {
            DirectiveKind::Group => {
                self.open_include = false;
                self.items.push(Item::Group(name.clone()));
                self.group = Some(name);
            }
            DirectiveKind::IncludeFile => {
                self.items.push(Item::Include(IncludeDirective {
                    source: name,
                    removed: Vec::new(),
                    line,
                }));
                self.open_include = true;
            }
            DirectiveKind::RemoveObject => {
                let location = self.at(line);
                let include = match self.items.last_mut() {
                    Some(Item::Include(include)) if self.open_include => Some(include),
                    _ => None,
                };
                match include {
                    Some(include) => include.removed.push(name),
                    None => {
                        record(
                            &mut self.diagnostics,
                            Diagnostic::warning(
                                DiagnosticKind::DirectiveOutsideObject,
                                location,
                                format!("\\remove-object {name} does not follow an \\include-file"),
                            ),
                        );
                    }
                }
            }
            _ => {}
        }
    }

    fn start_object(&mut self, name: String, terminator: Option<Separator>, line: usize) {
        self.open_include = false;
        let mut def = ObjectDef::new(name);
        def.group = self.group.clone();
        self.current = Some(ObjectBuilder {
            def,
            line,
            closed: terminator == Some(Separator::Semicolon),
            failed: false,
            pending_begin_extensible: false,
            field: None,
        });
        self.state = State::InObjectHeader;
    }

    fn start_field(&mut self, id: FieldId, terminator: Option<Separator>, line: usize) {
        let location = self.at(line);
        let Some(object) = self.current.as_mut() else {
            record(
                &mut self.diagnostics,
                Diagnostic::error(
                    DiagnosticKind::FieldOutsideObject,
                    location,
                    format!("field {id} is not inside an object"),
                ),
            );
            return;
        };

        finish_field(object, self.source, &mut self.diagnostics);

        let mut def = FieldDef::new(id, "");
        if object.pending_begin_extensible {
            def.begin_extensible = true;
            object.pending_begin_extensible = false;
        }
        object.field = Some(FieldBuilder {
            def,
            line,
            min_forms: BoundForms::default(),
            max_forms: BoundForms::default(),
        });
        object.closed = terminator == Some(Separator::Semicolon);
        self.state = State::InField;
    }

    fn end_object(&mut self) {
        self.state = State::TopLevel;
        let Some(mut object) = self.current.take() else {
            return;
        };
        finish_field(&mut object, self.source, &mut self.diagnostics);

        let location = self.at(object.line);
        if !object.closed {
            record(
                &mut self.diagnostics,
                Diagnostic::error(
                    DiagnosticKind::UnterminatedObject,
                    location,
                    format!("object {} is not terminated by ';'", object.def.name),
                ),
            );
            return;
        }
        if object.failed {
            debug!(object = %object.def.name, "dropping malformed object");
            return;
        }
        if !self.names.insert(lookup_key(&object.def.name)) {
            record(
                &mut self.diagnostics,
                Diagnostic::error(
                    DiagnosticKind::DuplicateObject,
                    location,
                    format!("object {} is already defined", object.def.name),
                ),
            );
            return;
        }

        debug!(
            object = %object.def.name,
            fields = object.def.fields.len(),
            "parsed object"
        );
        self.items.push(Item::Object(ParsedObject {
            def: object.def,
            source: self.source.map(str::to_string),
            line: object.line,
        }));
    }

    fn apply(&mut self, scope: Scope, directive: Directive, line: usize) {
        let location = self.at(line);
        let grammar = self.grammar;
        let Some(object) = self.current.as_mut() else {
            return;
        };
        if scope == Scope::Field {
            if let Some(field) = object.field.as_mut() {
                if !apply_field(grammar, field, directive, location, &mut self.diagnostics) {
                    object.failed = true;
                }
                return;
            }
        }
        apply_object(object, directive, location, &mut self.diagnostics);
    }
}

fn apply_object(
    object: &mut ObjectBuilder,
    directive: Directive,
    location: SourceLocation,
    diagnostics: &mut Diagnostics,
) {
    use DirectiveKind as K;
    let def = &mut object.def;
    let arg = directive.argument;
    match directive.kind {
        K::Memo | K::Note => append_line(&mut def.memo, &arg),
        K::UniqueObject => def.unique = true,
        K::RequiredObject => def.required = true,
        K::Obsolete => def.obsolete = Some(arg),
        K::UrlObject => def.url_object = true,
        K::Extensible => def.extensible = parse_count(&arg, "extensible", location, diagnostics),
        K::Format => def.format = Some(arg),
        K::MinFields => def.min_fields = parse_count(&arg, "min-fields", location, diagnostics),
        K::MaxFields => def.max_fields = parse_count(&arg, "max-fields", location, diagnostics),
        K::BeginExtensible => object.pending_begin_extensible = true,
        // Handled before scope dispatch.
        K::Group | K::IncludeFile | K::RemoveObject => {}
        // Not classified in object scope.
        K::Field
        | K::RequiredField
        | K::Autosizable
        | K::Autocalculatable
        | K::Retaincase
        | K::UnitsBasedOnField
        | K::Units
        | K::IpUnits
        | K::MinimumExclusive
        | K::MinimumInclusive
        | K::MaximumExclusive
        | K::MaximumInclusive
        | K::Deprecated
        | K::Default
        | K::Type
        | K::Key
        | K::ObjectList
        | K::ExternalList
        | K::ReferenceClassName
        | K::Reference => {}
    }
}

/// Applies a field directive. Returns false if the owning object must be dropped.
fn apply_field(
    grammar: &Grammar,
    field: &mut FieldBuilder,
    directive: Directive,
    location: SourceLocation,
    diagnostics: &mut Diagnostics,
) -> bool {
    use DirectiveKind as K;
    let def = &mut field.def;
    let arg = directive.argument;
    match directive.kind {
        K::Field => def.name = arg,
        K::RequiredField => def.required = true,
        K::Autosizable => def.autosizable = true,
        K::Autocalculatable => def.autocalculatable = true,
        K::Retaincase => def.retaincase = true,
        K::UnitsBasedOnField => def.units_based_on_field = Some(arg),
        K::Units => def.units = Some(arg),
        K::IpUnits => def.ip_units = Some(arg),
        K::MinimumExclusive => return set_bound(field, true, false, &arg, location, diagnostics),
        K::MinimumInclusive => return set_bound(field, true, true, &arg, location, diagnostics),
        K::MaximumExclusive => return set_bound(field, false, false, &arg, location, diagnostics),
        K::MaximumInclusive => return set_bound(field, false, true, &arg, location, diagnostics),
        K::Deprecated => def.deprecated = Some(arg),
        K::Default => {
            def.default = Some(match grammar.default_sentinel(&arg) {
                Some(Sentinel::Autosize) => DefaultValue::Autosize,
                Some(Sentinel::Autocalculate) => DefaultValue::Autocalculate,
                None => DefaultValue::Literal(arg),
            });
        }
        K::Type => {
            if let Ok(field_type) = arg.parse() {
                def.field_type = field_type;
            }
        }
        K::Key => {
            if def.has_key(&arg) {
                record(
                    diagnostics,
                    Diagnostic::warning(
                        DiagnosticKind::DuplicateKey,
                        location,
                        format!("key {arg:?} is declared twice on field {}", def.id),
                    ),
                );
            } else {
                def.keys.push(arg);
            }
        }
        K::ObjectList => def.object_lists.push(arg),
        K::ExternalList => def.external_list = Some(arg),
        K::ReferenceClassName => def.reference_class_names.push(arg),
        K::Reference => def.references.push(arg),
        K::Note => append_line(&mut def.note, &arg),
        K::BeginExtensible => def.begin_extensible = true,
        // Handled before scope dispatch.
        K::Group | K::IncludeFile | K::RemoveObject => {}
        // Not classified in field scope.
        K::Memo
        | K::UniqueObject
        | K::RequiredObject
        | K::Obsolete
        | K::UrlObject
        | K::Extensible
        | K::Format
        | K::MinFields
        | K::MaxFields => {}
    }
    true
}

fn set_bound(
    field: &mut FieldBuilder,
    is_minimum: bool,
    inclusive: bool,
    arg: &str,
    location: SourceLocation,
    diagnostics: &mut Diagnostics,
) -> bool {
    let forms = if is_minimum {
        &mut field.min_forms
    } else {
        &mut field.max_forms
    };
    if (inclusive && forms.exclusive) || (!inclusive && forms.inclusive) {
        let which = if is_minimum { "minimum" } else { "maximum" };
        record(
            diagnostics,
            Diagnostic::error(
                DiagnosticKind::ConflictingBounds,
                location,
                format!(
                    "field {} declares both inclusive and exclusive {which}",
                    field.def.id
                ),
            ),
        );
        return false;
    }
    if inclusive {
        forms.inclusive = true;
    } else {
        forms.exclusive = true;
    }

    match arg.parse::<f64>() {
        Ok(value) => {
            let bound = if inclusive {
                Bound::inclusive(value)
            } else {
                Bound::exclusive(value)
            };
            if is_minimum {
                field.def.minimum = Some(bound);
            } else {
                field.def.maximum = Some(bound);
            }
        }
        Err(_) => record(
            diagnostics,
            Diagnostic::warning(
                DiagnosticKind::InvalidNumber,
                location,
                format!("bound {arg:?} on field {} is not a number", field.def.id),
            ),
        ),
    }
    true
}

/// Moves the field under construction into its object.
fn finish_field(object: &mut ObjectBuilder, source: Option<&str>, diagnostics: &mut Diagnostics) {
    let Some(field) = object.field.take() else {
        return;
    };
    let location = SourceLocation::new(source, field.line);
    let mut def = field.def;

    if let (Some(min), Some(max)) = (&def.minimum, &def.maximum) {
        if !bounds_consistent(min, max) {
            record(
                diagnostics,
                Diagnostic::warning(
                    DiagnosticKind::InvertedBounds,
                    location.clone(),
                    format!(
                        "field {} minimum {} is not below maximum {}",
                        def.id,
                        min.render_min(),
                        max.render_max()
                    ),
                ),
            );
        }
    }

    let missing_flag = match def.default {
        Some(DefaultValue::Autosize) if !def.autosizable => Some("autosizable"),
        Some(DefaultValue::Autocalculate) if !def.autocalculatable => Some("autocalculatable"),
        _ => None,
    };
    if let Some(flag) = missing_flag {
        record(
            diagnostics,
            Diagnostic::warning(
                DiagnosticKind::SentinelWithoutFlag,
                location.clone(),
                format!("field {} has a sentinel default but is not {flag}", def.id),
            ),
        );
    }

    if object.def.fields.iter().any(|f| f.id == def.id) {
        record(
            diagnostics,
            Diagnostic::warning(
                DiagnosticKind::DuplicateFieldId,
                location,
                format!("field {} is declared twice in {}", def.id, object.def.name),
            ),
        );
    }

    def.index = object.def.fields.len();
    object.def.fields.push(def);
}

fn parse_count(
    arg: &str,
    directive: &str,
    location: SourceLocation,
    diagnostics: &mut Diagnostics,
) -> Option<usize> {
    match arg.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            record(
                diagnostics,
                Diagnostic::warning(
                    DiagnosticKind::InvalidNumber,
                    location,
                    format!("\\{directive} argument {arg:?} is not a count"),
                ),
            );
            None
        }
    }
}

fn append_line(text: &mut String, line: &str) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(line);
}

pub(crate) fn record(diagnostics: &mut Diagnostics, diagnostic: Diagnostic) {
    if diagnostic.is_error() {
        warn!(%diagnostic, "malformed dictionary source");
    }
    diagnostics.push(diagnostic);
}
