/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions for IDD dictionaries.
//!
//! This module defines the structures that represent a parsed dictionary:
//! - [`FieldType`]: Semantic type of a field
//! - [`Bound`]: Inclusive or exclusive numeric bound
//! - [`DefaultValue`]: Literal or sentinel default
//! - [`FieldDef`]: Field definitions with type, bounds, keys, and references
//! - [`ObjectDef`]: Object definitions with flags and ordered fields
//! - [`Dictionary`]: The frozen, immutable schema

use ironidd_core::types::{FieldId, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Semantic type of a dictionary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Whole number.
    Integer,
    /// Floating point number.
    Real,
    /// Free text.
    Alpha,
    /// One of the field's keys.
    Choice,
    /// Name of a node.
    Node,
    /// Name of an object published under one of the field's object lists.
    ObjectList,
    /// Name taken from an externally supplied list.
    ExternalList,
    /// URL.
    Url,
    /// Object handle.
    Handle,
}

impl FieldType {
    /// Returns the keyword used in `\type` directives.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Alpha => "alpha",
            Self::Choice => "choice",
            Self::Node => "node",
            Self::ObjectList => "object-list",
            Self::ExternalList => "external-list",
            Self::Url => "url",
            Self::Handle => "handle",
        }
    }

    /// Returns true if this type represents a numeric value.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }

    /// Returns the type assumed for a field that declares none.
    #[must_use]
    pub const fn default_for(track: Track) -> Self {
        match track {
            Track::Alpha => Self::Alpha,
            Track::Numeric => Self::Real,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a `\type` keyword that names no known type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field type: {0}")]
pub struct UnknownFieldType(pub String);

impl std::str::FromStr for FieldType {
    type Err = UnknownFieldType;

    /// Creates a FieldType from its `\type` keyword, ignoring case.
    ///
    /// # Arguments
    /// * `s` - The type keyword from the dictionary
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "integer" => Self::Integer,
            "real" => Self::Real,
            "alpha" => Self::Alpha,
            "choice" => Self::Choice,
            "node" => Self::Node,
            "object-list" => Self::ObjectList,
            "external-list" => Self::ExternalList,
            "url" => Self::Url,
            "handle" => Self::Handle,
            _ => return Err(UnknownFieldType(s.to_string())),
        })
    }
}

/// Numeric bound on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// Bound value.
    pub value: f64,
    /// Whether the bound value itself is allowed.
    pub inclusive: bool,
}

impl Bound {
    /// Creates an inclusive bound.
    #[must_use]
    pub const fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    /// Creates an exclusive bound.
    #[must_use]
    pub const fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    /// Returns true if `x` satisfies this bound used as a minimum.
    #[must_use]
    pub fn admits_above(&self, x: f64) -> bool {
        if self.inclusive {
            x >= self.value
        } else {
            x > self.value
        }
    }

    /// Returns true if `x` satisfies this bound used as a maximum.
    #[must_use]
    pub fn admits_below(&self, x: f64) -> bool {
        if self.inclusive {
            x <= self.value
        } else {
            x < self.value
        }
    }

    /// Renders the bound as a minimum, e.g. `0` or `>0`.
    #[must_use]
    pub fn render_min(&self) -> String {
        if self.inclusive {
            self.value.to_string()
        } else {
            format!(">{}", self.value)
        }
    }

    /// Renders the bound as a maximum, e.g. `100` or `<100`.
    #[must_use]
    pub fn render_max(&self) -> String {
        if self.inclusive {
            self.value.to_string()
        } else {
            format!("<{}", self.value)
        }
    }
}

/// Returns true if some value can satisfy both bounds.
#[must_use]
pub fn bounds_consistent(minimum: &Bound, maximum: &Bound) -> bool {
    if minimum.inclusive && maximum.inclusive {
        minimum.value <= maximum.value
    } else {
        minimum.value < maximum.value
    }
}

/// Default value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Literal text, stored verbatim.
    Literal(String),
    /// Computed by autosizing.
    Autosize,
    /// Computed automatically.
    Autocalculate,
}

impl DefaultValue {
    /// Returns the literal text, if this is not a sentinel.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            Self::Autosize | Self::Autocalculate => None,
        }
    }

    /// Returns true for the autosize and autocalculate sentinels.
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

/// Definition of a dictionary field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Declared identifier (`A1`, `N3`, ...).
    pub id: FieldId,
    /// 0-based position within the owning object.
    pub index: usize,
    /// Name from `\field`.
    pub name: String,
    /// Semantic type.
    pub field_type: FieldType,
    /// SI units.
    pub units: Option<String>,
    /// IP units.
    pub ip_units: Option<String>,
    /// Field whose value determines this field's units.
    pub units_based_on_field: Option<String>,
    /// Lower bound.
    pub minimum: Option<Bound>,
    /// Upper bound.
    pub maximum: Option<Bound>,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether a value must be given.
    pub required: bool,
    /// Whether `autosize` is accepted.
    pub autosizable: bool,
    /// Whether `autocalculate` is accepted.
    pub autocalculatable: bool,
    /// Whether the value keeps its case.
    pub retaincase: bool,
    /// Deprecation reason, if deprecated.
    pub deprecated: Option<String>,
    /// Whether this field starts the first extensible group.
    pub begin_extensible: bool,
    /// Allowed values of a choice field, in declaration order.
    pub keys: Vec<String>,
    /// Reference lists this field accepts values from.
    pub object_lists: Vec<String>,
    /// External list this field accepts values from.
    pub external_list: Option<String>,
    /// Reference lists this field publishes its value under.
    pub references: Vec<String>,
    /// Class-name reference lists this field publishes its object under.
    pub reference_class_names: Vec<String>,
    /// Free-text notes.
    pub note: String,
    /// Whether this is the last field of its object.
    pub is_last: bool,
}

impl FieldDef {
    /// Creates a new field definition with the track's default type.
    ///
    /// # Arguments
    /// * `id` - The declared identifier
    /// * `name` - The field name
    #[must_use]
    pub fn new(id: FieldId, name: impl Into<String>) -> Self {
        Self {
            id,
            index: 0,
            name: name.into(),
            field_type: FieldType::default_for(id.track),
            units: None,
            ip_units: None,
            units_based_on_field: None,
            minimum: None,
            maximum: None,
            default: None,
            required: false,
            autosizable: false,
            autocalculatable: false,
            retaincase: false,
            deprecated: None,
            begin_extensible: false,
            keys: Vec::new(),
            object_lists: Vec::new(),
            external_list: None,
            references: Vec::new(),
            reference_class_names: Vec::new(),
            note: String::new(),
            is_last: false,
        }
    }

    /// Sets the semantic type.
    #[must_use]
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Sets the bounds.
    #[must_use]
    pub fn with_bounds(mut self, minimum: Option<Bound>, maximum: Option<Bound>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Sets the keys of a choice field.
    #[must_use]
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the field required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns true if the field is deprecated.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }

    /// Returns true if `key` is one of the field's keys, ignoring case.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k.eq_ignore_ascii_case(key.trim()))
    }
}

/// Definition of a dictionary object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDef {
    /// Object name, case preserved.
    pub name: String,
    /// Documentation from `\memo` and `\note`, one line per directive.
    pub memo: String,
    /// Owning group, if a `\group` preceded the object.
    pub group: Option<String>,
    /// At most one instance allowed.
    pub unique: bool,
    /// At least one instance required.
    pub required: bool,
    /// Obsolescence reason, if obsolete.
    pub obsolete: Option<String>,
    /// Whether the object can carry URLs.
    pub url_object: bool,
    /// Format hint from `\format`.
    pub format: Option<String>,
    /// Minimum number of fields an instance must carry.
    pub min_fields: Option<usize>,
    /// Maximum number of fields an instance may carry.
    pub max_fields: Option<usize>,
    /// Size of the repeating group, from `\extensible:N`.
    pub extensible: Option<usize>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ObjectDef {
    /// Creates a new object definition with no fields.
    ///
    /// # Arguments
    /// * `name` - The object name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            memo: String::new(),
            group: None,
            unique: false,
            required: false,
            obsolete: None,
            url_object: false,
            format: None,
            min_fields: None,
            max_fields: None,
            extensible: None,
            fields: Vec::new(),
        }
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    /// Gets a field by 0-based position.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&FieldDef> {
        self.fields.get(index)
    }

    /// Gets a field by declared identifier.
    #[must_use]
    pub fn field_by_id(&self, id: FieldId) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Gets a field by name, ignoring case.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Returns the semantic type of the field at `index`.
    #[must_use]
    pub fn field_type(&self, index: usize) -> Option<FieldType> {
        self.field(index).map(|f| f.field_type)
    }

    /// Returns the last declared field.
    #[must_use]
    pub fn last_field(&self) -> Option<&FieldDef> {
        self.fields.last()
    }

    /// Returns true if the object is obsolete.
    #[must_use]
    pub const fn is_obsolete(&self) -> bool {
        self.obsolete.is_some()
    }

    /// Returns true if the object declares `\extensible:N`.
    #[must_use]
    pub const fn is_extensible(&self) -> bool {
        self.extensible.is_some()
    }

    /// Returns the number of fields in one extensible group, 0 if not extensible.
    #[must_use]
    pub fn num_fields_in_group(&self) -> usize {
        self.extensible.unwrap_or(0)
    }

    /// Returns the number of fields that precede the extensible groups.
    ///
    /// A field marked `\begin-extensible` sets the boundary; without one the
    /// last `N` fields form the group.
    #[must_use]
    pub fn extensible_prefix_len(&self) -> usize {
        match self.extensible {
            None => self.fields.len(),
            Some(size) => self
                .fields
                .iter()
                .position(|f| f.begin_extensible)
                .unwrap_or_else(|| self.fields.len().saturating_sub(size)),
        }
    }

    /// Returns the fields that never repeat.
    #[must_use]
    pub fn nonextensible_fields(&self) -> &[FieldDef] {
        &self.fields[..self.extensible_prefix_len()]
    }

    /// Returns the first repeating unit of fields, empty if not extensible.
    #[must_use]
    pub fn extensible_group(&self) -> &[FieldDef] {
        let start = self.extensible_prefix_len();
        let end = (start + self.num_fields_in_group()).min(self.fields.len());
        &self.fields[start..end]
    }
}

/// Serialized form of a [`Dictionary`]; the name index is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DictionaryData {
    version: Option<String>,
    build: Option<String>,
    header: String,
    groups: Vec<String>,
    objects: Vec<ObjectDef>,
}

/// Complete, frozen dictionary.
///
/// Built once by the assembler and read-only afterwards, so it can be shared
/// across threads (e.g. behind an `Arc`) without synchronization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DictionaryData", into = "DictionaryData")]
pub struct Dictionary {
    version: Option<String>,
    build: Option<String>,
    header: String,
    groups: Vec<String>,
    objects: Vec<ObjectDef>,
    index: HashMap<String, usize>,
}

impl From<DictionaryData> for Dictionary {
    fn from(data: DictionaryData) -> Self {
        Self::new(data.version, data.build, data.header, data.groups, data.objects)
    }
}

impl From<Dictionary> for DictionaryData {
    fn from(dict: Dictionary) -> Self {
        Self {
            version: dict.version,
            build: dict.build,
            header: dict.header,
            groups: dict.groups,
            objects: dict.objects,
        }
    }
}

impl Dictionary {
    /// Creates a dictionary from already validated parts.
    ///
    /// Object names are expected to be unique ignoring case; on collision the
    /// first object keeps the name in the lookup index.
    pub(crate) fn new(
        version: Option<String>,
        build: Option<String>,
        header: String,
        groups: Vec<String>,
        objects: Vec<ObjectDef>,
    ) -> Self {
        let mut index = HashMap::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            index.entry(lookup_key(&object.name)).or_insert(i);
        }
        Self {
            version,
            build,
            header,
            groups,
            objects,
            index,
        }
    }

    /// Returns the `!IDD_Version` value.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the `!IDD_BUILD` value.
    #[must_use]
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    /// Returns the raw header text.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Returns the group names in order of first appearance.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Returns an iterator over all object definitions in source order.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectDef> {
        self.objects.iter()
    }

    /// Gets an object definition by name, ignoring case.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&ObjectDef> {
        self.index
            .get(&lookup_key(name))
            .and_then(|&i| self.objects.get(i))
    }

    /// Returns true if an object with this name exists, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&lookup_key(name))
    }

    /// Returns the number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the dictionary defines no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the objects belonging to a group, in source order.
    pub fn objects_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ObjectDef> {
        self.objects
            .iter()
            .filter(move |o| o.group.as_deref() == Some(group))
    }

    /// Returns the objects flagged `\required-object`.
    pub fn required_objects(&self) -> impl Iterator<Item = &ObjectDef> {
        self.objects.iter().filter(|o| o.required)
    }

    /// Returns the objects flagged `\unique-object`.
    pub fn unique_objects(&self) -> impl Iterator<Item = &ObjectDef> {
        self.objects.iter().filter(|o| o.unique)
    }

    /// Returns the object describing the model version, if any.
    #[must_use]
    pub fn version_object(&self) -> Option<&ObjectDef> {
        let grammar = crate::grammar::Grammar::get();
        self.objects
            .iter()
            .find(|o| grammar.is_version_object_name(&o.name))
    }
}

pub(crate) fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_object() -> ObjectDef {
        let mut object = ObjectDef::new("OS:Surface");
        object.fields = vec![
            FieldDef::new(FieldId::alpha(1), "Name"),
            FieldDef::new(FieldId::alpha(2), "Type"),
            FieldDef::new(FieldId::numeric(1), "Vertex 1 X"),
            FieldDef::new(FieldId::numeric(2), "Vertex 1 Y"),
            FieldDef::new(FieldId::numeric(3), "Vertex 1 Z"),
        ];
        for (i, field) in object.fields.iter_mut().enumerate() {
            field.index = i;
        }
        object
    }

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("real".parse::<FieldType>().unwrap(), FieldType::Real);
        assert_eq!("REAL".parse::<FieldType>().unwrap(), FieldType::Real);
        assert_eq!(
            "Object-List".parse::<FieldType>().unwrap(),
            FieldType::ObjectList
        );
        assert!("float".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_defaults() {
        assert_eq!(FieldType::default_for(Track::Alpha), FieldType::Alpha);
        assert_eq!(FieldType::default_for(Track::Numeric), FieldType::Real);
        assert!(FieldType::Integer.is_numeric());
        assert!(!FieldType::Choice.is_numeric());
    }

    #[test]
    fn test_bound_checks() {
        let min = Bound::exclusive(0.0);
        assert!(!min.admits_above(0.0));
        assert!(min.admits_above(0.1));
        let max = Bound::inclusive(100.0);
        assert!(max.admits_below(100.0));
        assert!(!max.admits_below(100.5));
        assert_eq!(min.render_min(), ">0");
        assert_eq!(max.render_max(), "100");
    }

    #[test]
    fn test_bounds_consistent() {
        assert!(bounds_consistent(&Bound::inclusive(1.0), &Bound::inclusive(1.0)));
        assert!(!bounds_consistent(&Bound::exclusive(1.0), &Bound::inclusive(1.0)));
        assert!(!bounds_consistent(&Bound::inclusive(2.0), &Bound::inclusive(1.0)));
    }

    #[test]
    fn test_extensible_without_marker() {
        let mut object = sample_object();
        object.extensible = Some(3);
        assert_eq!(object.extensible_prefix_len(), 2);
        assert_eq!(object.nonextensible_fields().len(), 2);
        let group: Vec<_> = object.extensible_group().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(group, vec!["Vertex 1 X", "Vertex 1 Y", "Vertex 1 Z"]);
    }

    #[test]
    fn test_extensible_with_marker() {
        let mut object = sample_object();
        object.extensible = Some(1);
        object.fields[1].begin_extensible = true;
        assert_eq!(object.extensible_prefix_len(), 1);
        assert_eq!(object.extensible_group().len(), 1);
        assert_eq!(object.extensible_group()[0].name, "Type");
    }

    #[test]
    fn test_object_field_lookup() {
        let object = sample_object();
        assert_eq!(object.field_by_name("vertex 1 y").unwrap().index, 3);
        assert_eq!(object.field_by_id(FieldId::alpha(2)).unwrap().name, "Type");
        assert_eq!(object.field_type(0), Some(FieldType::Alpha));
        assert_eq!(object.field_type(2), Some(FieldType::Real));
        assert!(object.field(9).is_none());
    }

    #[test]
    fn test_dictionary_lookup_is_case_insensitive() {
        let mut version = ObjectDef::new("OS:Version");
        version.unique = true;
        let dict = Dictionary::new(
            Some("1.0.0".to_string()),
            None,
            String::new(),
            vec![],
            vec![version, sample_object()],
        );
        assert!(dict.object("os:surface").is_some());
        assert!(dict.contains("OS:VERSION"));
        assert_eq!(dict.object("OS:Surface").unwrap().name, "OS:Surface");
        assert!(dict.object("OS:Missing").is_none());
        assert_eq!(dict.version_object().unwrap().name, "OS:Version");
        assert_eq!(dict.unique_objects().count(), 1);
        assert_eq!(dict.len(), 2);
    }
}
