/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Value checks against field definitions.

use crate::schema::{FieldDef, FieldType};
use ironidd_core::error::ValueError;

const AUTOSIZE: &str = "autosize";
const AUTOCALCULATE: &str = "autocalculate";

impl FieldDef {
    /// Checks a raw value against this field's definition.
    ///
    /// Empty values are accepted unless the field is required. Numeric fields
    /// accept `autosize`/`autocalculate` when flagged for them.
    ///
    /// # Arguments
    /// * `value` - The raw value as it would appear in a model file
    ///
    /// # Errors
    /// Returns the first rule the value breaks.
    pub fn validate(&self, value: &str) -> Result<(), ValueError> {
        let value = value.trim();
        if value.is_empty() {
            if self.required {
                return Err(ValueError::Required {
                    field: self.label(),
                });
            }
            return Ok(());
        }

        match self.field_type {
            FieldType::Integer | FieldType::Real => self.validate_numeric(value),
            FieldType::Choice => {
                if self.has_key(value) {
                    Ok(())
                } else {
                    Err(ValueError::NotAKey {
                        field: self.label(),
                        value: value.to_string(),
                    })
                }
            }
            FieldType::Alpha
            | FieldType::Node
            | FieldType::ObjectList
            | FieldType::ExternalList
            | FieldType::Url
            | FieldType::Handle => Ok(()),
        }
    }

    fn validate_numeric(&self, value: &str) -> Result<(), ValueError> {
        if value.eq_ignore_ascii_case(AUTOSIZE) {
            return if self.autosizable {
                Ok(())
            } else {
                Err(ValueError::AutosizeNotAllowed {
                    field: self.label(),
                })
            };
        }
        if value.eq_ignore_ascii_case(AUTOCALCULATE) {
            return if self.autocalculatable {
                Ok(())
            } else {
                Err(ValueError::AutocalculateNotAllowed {
                    field: self.label(),
                })
            };
        }

        let number = if self.field_type == FieldType::Integer {
            value
                .parse::<i64>()
                .map(|n| n as f64)
                .map_err(|_| ValueError::NotAnInteger {
                    field: self.label(),
                    value: value.to_string(),
                })?
        } else {
            value.parse::<f64>().map_err(|_| ValueError::NotANumber {
                field: self.label(),
                value: value.to_string(),
            })?
        };

        if let Some(minimum) = &self.minimum {
            if !minimum.admits_above(number) {
                return Err(ValueError::BelowMinimum {
                    field: self.label(),
                    value: number,
                    bound: minimum.render_min(),
                });
            }
        }
        if let Some(maximum) = &self.maximum {
            if !maximum.admits_below(number) {
                return Err(ValueError::AboveMaximum {
                    field: self.label(),
                    value: number,
                    bound: maximum.render_max(),
                });
            }
        }
        Ok(())
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Bound, FieldDef, FieldType};
    use ironidd_core::error::ValueError;
    use ironidd_core::types::FieldId;

    #[test]
    fn test_required_field() {
        let field = FieldDef::new(FieldId::alpha(1), "Name").required();
        assert!(matches!(field.validate("  "), Err(ValueError::Required { .. })));
        assert!(field.validate("Zone 1").is_ok());

        let optional = FieldDef::new(FieldId::alpha(2), "Notes");
        assert!(optional.validate("").is_ok());
    }

    #[test]
    fn test_real_bounds() {
        let field = FieldDef::new(FieldId::numeric(1), "Fraction")
            .with_bounds(Some(Bound::exclusive(0.0)), Some(Bound::inclusive(1.0)));
        assert!(field.validate("0.5").is_ok());
        assert!(field.validate("1").is_ok());
        assert!(matches!(
            field.validate("0"),
            Err(ValueError::BelowMinimum { ref bound, .. }) if bound == ">0"
        ));
        assert!(matches!(
            field.validate("1.5"),
            Err(ValueError::AboveMaximum { .. })
        ));
        assert!(matches!(
            field.validate("half"),
            Err(ValueError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_integer_field() {
        let field = FieldDef::new(FieldId::numeric(1), "Count").with_type(FieldType::Integer);
        assert!(field.validate("3").is_ok());
        assert!(matches!(
            field.validate("3.5"),
            Err(ValueError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_choice_keys_ignore_case() {
        let field = FieldDef::new(FieldId::alpha(1), "Roughness")
            .with_type(FieldType::Choice)
            .with_keys(["Smooth", "Rough"]);
        assert!(field.validate("smooth").is_ok());
        assert!(matches!(
            field.validate("Bumpy"),
            Err(ValueError::NotAKey { .. })
        ));
    }

    #[test]
    fn test_autosize_and_autocalculate() {
        let mut field = FieldDef::new(FieldId::numeric(1), "Flow Rate");
        assert!(matches!(
            field.validate("Autosize"),
            Err(ValueError::AutosizeNotAllowed { .. })
        ));
        field.autosizable = true;
        assert!(field.validate("AUTOSIZE").is_ok());
        assert!(matches!(
            field.validate("autocalculate"),
            Err(ValueError::AutocalculateNotAllowed { .. })
        ));
    }

    #[test]
    fn test_unnamed_field_uses_id() {
        let field = FieldDef::new(FieldId::numeric(4), "");
        let err = field.validate("x").unwrap_err();
        assert_eq!(err.to_string(), "field N4 expects a number, got \"x\"");
    }
}
