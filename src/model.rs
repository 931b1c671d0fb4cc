//! Storage model descriptors.
//!
//! Models back records: they type relations, primary-key path parameters and
//! read-only fields whose `source` points at a model attribute.

use crate::descriptor::{FieldDescriptor, FieldKind, Validator};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    /// Human readable name; derived from `name` when absent
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<ModelField>,
    /// Typed properties and methods usable as field sources
    #[serde(default)]
    pub properties: Vec<ModelProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelField {
    pub name: String,
    /// Class lineage, most specific first, e.g. `[PriceField, DecimalField]`
    pub class_path: Vec<String>,
    /// Storage type reported by the field, used when no class is known
    #[serde(default)]
    pub internal_type: Option<String>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub null: bool,
    #[serde(default)]
    pub blank: bool,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub choices: Option<Vec<Value>>,
    #[serde(default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub max_digits: Option<u32>,
    #[serde(default)]
    pub decimal_places: Option<u32>,
    #[serde(default)]
    pub help_text: Option<String>,
    /// Target model of a relation
    #[serde(default)]
    pub related_model: Option<String>,
    /// `ipv4`, `ipv6` or `both` for IP address fields
    #[serde(default)]
    pub protocol: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProperty {
    pub name: String,
    /// Declared return type, e.g. `i64`, `Option<String>` or a model name
    #[serde(default)]
    pub return_hint: Option<String>,
}

/// Where a dotted field source ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceTarget<'a> {
    Field {
        model: &'a ModelDescriptor,
        field: &'a ModelField,
    },
    Callable {
        property: &'a ModelProperty,
    },
}

const INT32_MIN: i64 = i32::MIN as i64;
const INT32_MAX: i64 = i32::MAX as i64;
const SLUG_PATTERN: &str = "^[-a-zA-Z0-9_]+$";

impl ModelDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verbose_name: None,
            fields: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: ModelField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_property(mut self, name: &str, return_hint: &str) -> Self {
        self.properties.push(ModelProperty {
            name: name.to_string(),
            return_hint: Some(return_hint.to_string()),
        });
        self
    }

    /// Declared field, or the implicit `id` primary key
    pub fn get_field(&self, name: &str) -> Option<ModelField> {
        if let Some(field) = self.fields.iter().find(|f| f.name == name) {
            return Some(field.clone());
        }
        if name == "id" && !self.fields.iter().any(|f| f.primary_key) {
            return Some(ModelField::implicit_pk());
        }
        None
    }

    pub fn property(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The primary key; models without one get an implicit `id` auto field
    pub fn pk(&self) -> ModelField {
        self.fields
            .iter()
            .find(|f| f.primary_key)
            .cloned()
            .unwrap_or_else(ModelField::implicit_pk)
    }

    pub fn verbose_name(&self) -> String {
        self.verbose_name
            .clone()
            .unwrap_or_else(|| camel_case_to_spaces(&self.name))
    }

    /// Description used for primary-key path parameters
    pub fn pk_description(&self, field: &ModelField) -> String {
        let value_type = if field.is_a(&["AutoField", "BigAutoField", "SmallAutoField"]) {
            "unique integer value"
        } else if field.is_a(&["UUIDField"]) {
            "UUID string"
        } else {
            "unique value"
        };
        format!("A {} identifying this {}.", value_type, self.verbose_name())
    }
}

impl ModelField {
    pub fn new(name: impl Into<String>, class_path: &[&str]) -> Self {
        Self {
            name: name.into(),
            class_path: class_path.iter().map(|c| c.to_string()).collect(),
            internal_type: None,
            primary_key: false,
            null: false,
            blank: false,
            editable: true,
            has_default: false,
            choices: None,
            max_length: None,
            max_digits: None,
            decimal_places: None,
            help_text: None,
            related_model: None,
            protocol: None,
        }
    }

    fn implicit_pk() -> Self {
        Self {
            primary_key: true,
            ..Self::new("id", &["AutoField"])
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn related_to(mut self, model: impl Into<String>) -> Self {
        self.related_model = Some(model.into());
        self
    }

    pub fn with_choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn is_a(&self, classes: &[&str]) -> bool {
        self.class_path.iter().any(|c| classes.contains(&c.as_str()))
    }

    pub fn is_relation(&self) -> bool {
        self.is_a(&["ForeignKey", "OneToOneField", "ManyToManyField"])
    }

    /// Build the field descriptor a model serializer would generate for this
    /// field, using the first known class along its lineage.
    pub fn build_field(&self) -> Result<FieldDescriptor> {
        let class = self
            .class_path
            .iter()
            .find(|c| known_kind(c, self).is_some())
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "no known field class in lineage {:?} of model field \"{}\"",
                    self.class_path, self.name
                ))
            })?;
        self.build_field_as(class)
    }

    /// Build a field descriptor as if this field were of class `class`
    pub fn build_field_as(&self, class: &str) -> Result<FieldDescriptor> {
        let kind = match &self.choices {
            Some(choices) if !choices.is_empty() => FieldKind::Choice {
                choices: choices.clone(),
            },
            _ => known_kind(class, self).ok_or_else(|| {
                Error::InvalidArgument(format!("unknown model field class \"{}\"", class))
            })?,
        };

        let mut field = FieldDescriptor::new(self.name.clone(), kind);
        field.class_path = self.class_path.clone();
        field.many = class == "ManyToManyField";
        field.nullable = self.null || class == "NullBooleanField";
        field.help_text = self.help_text.clone().filter(|h| !h.is_empty());

        let is_auto = matches!(class, "AutoField" | "BigAutoField" | "SmallAutoField");
        field.read_only = is_auto || !self.editable;
        if !field.read_only && (self.null || self.blank || self.has_default) {
            field.required = Some(false);
        }

        if let (Some(limit), FieldKind::Char) = (self.max_length, &field.kind) {
            field.validators.push(Validator::MaxLength { limit });
        }
        if class == "SlugField" {
            field.validators.push(Validator::Regex {
                pattern: SLUG_PATTERN.to_string(),
            });
        }
        Ok(field)
    }
}

fn int_range(min: i64, max: i64) -> FieldKind {
    FieldKind::Integer {
        min_value: Some(Number::from(min)),
        max_value: Some(Number::from(max)),
    }
}

fn known_kind(class: &str, field: &ModelField) -> Option<FieldKind> {
    let kind = match class {
        "AutoField" | "BigAutoField" | "SmallAutoField" => FieldKind::Integer {
            min_value: None,
            max_value: None,
        },
        "IntegerField" => int_range(INT32_MIN, INT32_MAX),
        "BigIntegerField" => int_range(i64::MIN, i64::MAX),
        "SmallIntegerField" => int_range(-32768, 32767),
        "PositiveIntegerField" => int_range(0, INT32_MAX),
        "PositiveSmallIntegerField" => int_range(0, 32767),
        "FloatField" => FieldKind::Float {
            min_value: None,
            max_value: None,
        },
        "DecimalField" => FieldKind::Decimal {
            max_digits: field.max_digits,
            decimal_places: field.decimal_places,
            coerce_to_string: None,
            min_value: None,
            max_value: None,
        },
        "CharField" | "TextField" | "SlugField" => FieldKind::Char,
        "EmailField" => FieldKind::Email,
        "URLField" => FieldKind::Url,
        "UUIDField" => FieldKind::Uuid,
        "BooleanField" | "NullBooleanField" => FieldKind::Boolean,
        "DateField" => FieldKind::Date,
        "DateTimeField" => FieldKind::DateTime,
        "TimeField" => FieldKind::Time,
        "DurationField" => FieldKind::Duration,
        "GenericIPAddressField" => FieldKind::IpAddress {
            protocol: field.protocol.clone(),
        },
        "FileField" | "ImageField" => FieldKind::File { use_url: None },
        "JSONField" => FieldKind::Json,
        "ForeignKey" | "OneToOneField" | "ManyToManyField" => FieldKind::PrimaryKeyRelated {
            related_model: field.related_model.clone(),
        },
        _ => return None,
    };
    Some(kind)
}

/// `FieldSourceModel` -> `field source model`
fn camel_case_to_spaces(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || (next_lower && chars[i - 1].is_uppercase()) {
                out.push(' ');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Follow a dotted attribute path starting at `model`.
///
/// Intermediate segments must be relations or properties whose return hint
/// names another model. `lookup` resolves model names.
pub fn follow_field_source<'a, F>(
    model: &'a ModelDescriptor,
    path: &[&str],
    lookup: F,
) -> Result<SourceTarget<'a>>
where
    F: Fn(&str) -> Option<&'a ModelDescriptor>,
{
    let Some((last, intermediate)) = path.split_last() else {
        return Err(Error::InvariantViolation(
            "empty field source".to_string(),
        ));
    };

    let mut current = model;
    for segment in intermediate {
        let next_model = if let Some(field) = current.fields.iter().find(|f| f.name == *segment) {
            field.related_model.as_deref()
        } else {
            current
                .property(segment)
                .and_then(|p| p.return_hint.as_deref())
        };
        current = next_model.and_then(&lookup).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "cannot follow source \"{}\" through \"{}.{}\"",
                path.join("."),
                current.name,
                segment
            ))
        })?;
    }

    if let Some(field) = current.fields.iter().find(|f| f.name == *last) {
        return Ok(SourceTarget::Field {
            model: current,
            field,
        });
    }
    if let Some(property) = current.property(last) {
        return Ok(SourceTarget::Callable { property });
    }
    Err(Error::InvariantViolation(format!(
        "read-only field source \"{}\" must end in a model field or property of \"{}\"",
        path.join("."),
        current.name
    )))
}
