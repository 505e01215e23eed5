/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Code generator for IDD dictionaries.
//!
//! Generates Rust source code from a frozen dictionary:
//! - an object-type enum with `name()` / `from_name()`
//! - one field index enum per object, plus one for its extensible group

use ironidd_dictionary::schema::{Dictionary, FieldDef, ObjectDef};
use std::collections::HashSet;
use std::fmt::{self, Write};
use tracing::debug;

/// Configuration for code generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Whether to generate the object-type enum.
    pub generate_object_types: bool,
    /// Whether to generate per-object field index enums.
    pub generate_field_enums: bool,
    /// Name of the object-type enum.
    pub object_type_name: String,
    /// Item visibility (e.g., "pub", "pub(crate)").
    pub visibility: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generate_object_types: true,
            generate_field_enums: true,
            object_type_name: "IddObjectType".to_string(),
            visibility: "pub".to_string(),
        }
    }
}

/// Code generator for IDD dictionaries.
#[derive(Debug)]
pub struct CodeGenerator {
    config: GeneratorConfig,
}

impl CodeGenerator {
    /// Creates a new code generator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    /// Creates a new code generator with the specified configuration.
    #[must_use]
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generates Rust source code from a dictionary.
    ///
    /// # Arguments
    /// * `dict` - The dictionary to generate code from
    ///
    /// # Returns
    /// The generated Rust source code as a string.
    #[must_use]
    pub fn generate(&self, dict: &Dictionary) -> String {
        let mut code = String::new();
        let _ = self.write_source(&mut code, dict);
        debug!(objects = dict.len(), bytes = code.len(), "generated dictionary source");
        code
    }

    fn write_source(&self, code: &mut String, dict: &Dictionary) -> fmt::Result {
        writeln!(
            code,
            "//! Generated IDD {} definitions.",
            dict.version().unwrap_or("unversioned")
        )?;
        writeln!(code, "//!")?;
        writeln!(code, "//! This file was automatically generated. Do not edit.")?;
        writeln!(code)?;

        let idents = type_idents(dict);

        if self.config.generate_object_types {
            self.write_object_types(code, dict, &idents)?;
        }

        if self.config.generate_field_enums {
            for (object, ident) in dict.objects().zip(&idents) {
                self.write_field_enums(code, object, ident)?;
            }
        }

        Ok(())
    }

    /// Generates the object-type enum and its name mapping.
    fn write_object_types(&self, code: &mut String, dict: &Dictionary, idents: &[String]) -> fmt::Result {
        let vis = &self.config.visibility;
        let name = &self.config.object_type_name;

        writeln!(code, "/// Object types defined by the dictionary.")?;
        writeln!(code, "#[allow(non_camel_case_types)]")?;
        writeln!(code, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
        writeln!(code, "{vis} enum {name} {{")?;
        for (object, ident) in dict.objects().zip(idents) {
            writeln!(code, "    /// `{}`", object.name)?;
            writeln!(code, "    {ident},")?;
        }
        writeln!(code, "}}")?;
        writeln!(code)?;

        writeln!(code, "impl {name} {{")?;
        writeln!(code, "    /// All object types in dictionary order.")?;
        writeln!(code, "    {vis} const ALL: &'static [{name}] = &[")?;
        for ident in idents {
            writeln!(code, "        {name}::{ident},")?;
        }
        writeln!(code, "    ];")?;
        writeln!(code)?;

        writeln!(code, "    /// Returns the dictionary name of the object type.")?;
        writeln!(code, "    #[must_use]")?;
        writeln!(code, "    {vis} const fn name(&self) -> &'static str {{")?;
        writeln!(code, "        match *self {{")?;
        for (object, ident) in dict.objects().zip(idents) {
            writeln!(code, "            Self::{ident} => {:?},", object.name)?;
        }
        writeln!(code, "        }}")?;
        writeln!(code, "    }}")?;
        writeln!(code)?;

        writeln!(code, "    /// Looks up an object type by dictionary name, ignoring case.")?;
        writeln!(code, "    #[must_use]")?;
        writeln!(code, "    {vis} fn from_name(name: &str) -> Option<Self> {{")?;
        writeln!(code, "        let name = name.trim();")?;
        writeln!(
            code,
            "        Self::ALL.iter().copied().find(|t| t.name().eq_ignore_ascii_case(name))"
        )?;
        writeln!(code, "    }}")?;
        writeln!(code, "}}")?;
        writeln!(code)
    }

    /// Generates the field index enums of one object.
    fn write_field_enums(&self, code: &mut String, object: &ObjectDef, ident: &str) -> fmt::Result {
        let fixed = object.nonextensible_fields();
        if !fixed.is_empty() {
            writeln!(code, "/// Field indices of `{}`.", object.name)?;
            self.write_index_enum(code, &format!("{ident}Fields"), fixed, 0)?;
        }

        if object.is_extensible() {
            let group = object.extensible_group();
            if let Some(first) = group.first() {
                writeln!(
                    code,
                    "/// Field offsets within one extensible group of `{}`.",
                    object.name
                )?;
                self.write_index_enum(code, &format!("{ident}ExtensibleFields"), group, first.index)?;
            }
        }
        Ok(())
    }

    fn write_index_enum(
        &self,
        code: &mut String,
        name: &str,
        fields: &[FieldDef],
        base: usize,
    ) -> fmt::Result {
        writeln!(code, "#[allow(non_camel_case_types)]")?;
        writeln!(code, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
        writeln!(code, "#[repr(usize)]")?;
        writeln!(code, "{} enum {name} {{", self.config.visibility)?;

        let mut seen = HashSet::new();
        for field in fields {
            let mut variant = field_variant(field);
            if !seen.insert(variant.clone()) {
                variant.push_str(&field.id.to_string());
                seen.insert(variant.clone());
            }
            if !field.name.is_empty() {
                writeln!(code, "    /// {} `{}`", field.id, field.name)?;
            }
            writeln!(code, "    {variant} = {},", field.index - base)?;
        }

        writeln!(code, "}}")?;
        writeln!(code)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique enum identifiers for every object, in dictionary order.
fn type_idents(dict: &Dictionary) -> Vec<String> {
    let mut seen = HashSet::new();
    dict.objects()
        .map(|object| {
            let base = to_type_ident(&object.name);
            let mut ident = base.clone();
            let mut n = 2;
            while !seen.insert(ident.clone()) {
                ident = format!("{base}_{n}");
                n += 1;
            }
            ident
        })
        .collect()
}

/// Converts an object name to an identifier, mapping separators to `_`.
fn to_type_ident(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
        } else if !result.ends_with('_') {
            result.push('_');
        }
    }
    let result = result.trim_end_matches('_').to_string();
    fix_ident(result, "_")
}

/// Converts a field name to PascalCase.
fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

fn field_variant(field: &FieldDef) -> String {
    let name = to_pascal_case(&field.name);
    if name.is_empty() {
        field.id.to_string()
    } else {
        fix_ident(name, "Field")
    }
}

/// Makes a candidate identifier valid: non-empty, not starting with a digit,
/// not the `Self` keyword.
fn fix_ident(ident: String, prefix: &str) -> String {
    match ident.chars().next() {
        None => "Unnamed".to_string(),
        Some(c) if c.is_ascii_digit() => format!("{prefix}{ident}"),
        _ if ident == "Self" => "Self_".to_string(),
        _ => ident,
    }
}
