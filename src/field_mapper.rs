//! Field resolution: one field descriptor to one schema fragment.
//!
//! The mapping walks a fixed decision list. An explicit override wins, then a
//! registered field extension, then the built-in kinds. Field metadata and
//! validator constraints are attached afterwards, whichever branch produced
//! the base schema.

use crate::basic_types::BasicType;
use crate::descriptor::{FieldDescriptor, FieldKind, FieldOverride, RecordDescriptor, Validator};
use crate::error::{Error, Result};
use crate::extensions::ExtensionRegistry;
use crate::model::{follow_field_source, ModelDescriptor, ModelField, SourceTarget};
use crate::schema::Schema;
use crate::schema_generator::{Direction, SchemaGenerator};
use crate::type_resolver::{parse_hint, TypeHint};
use log::debug;
use serde_json::{Number, Value};

const INT32_MIN: f64 = i32::MIN as f64;
const INT32_MAX: f64 = i32::MAX as f64;

impl<'a> SchemaGenerator<'a> {
    /// Schema of a record field, with metadata and validator constraints
    pub fn resolve_field(
        &mut self,
        record: &RecordDescriptor,
        field: &FieldDescriptor,
        direction: Direction,
    ) -> Result<Schema> {
        let schema = self.map_field(record.model.as_deref(), field, direction)?;
        Ok(apply_validators(append_meta(schema, field), field))
    }

    /// Base schema of `field`. `model` is the backing model of the record
    /// owning the field, if any.
    pub fn map_field(
        &mut self,
        model: Option<&str>,
        field: &FieldDescriptor,
        direction: Direction,
    ) -> Result<Schema> {
        if let Some(field_override) = &field.override_ {
            return match field_override {
                FieldOverride::Basic(basic) => Ok(basic.schema_or_string()),
                FieldOverride::Field(substitute) => self.map_field(model, substitute, direction),
            };
        }

        let extensions: &'a ExtensionRegistry = self.extensions();
        if let Some(extension) = extensions.field_extension(&field.class_path) {
            debug!("Mapping field {} through extension {}", field.name, extension.target());
            return extension.map_field(self, field, direction);
        }

        let schema = match &field.kind {
            FieldKind::Nested { record } => {
                let schema = self.map_nested(field, record, direction)?;
                if field.many {
                    Schema::array(schema)
                } else {
                    schema
                }
            }
            FieldKind::PrimaryKeyRelated { related_model } => {
                let schema = self.map_related_pk(model, related_model.as_deref(), field, direction)?;
                wrap_many(schema, field.many)
            }
            FieldKind::HyperlinkedRelated | FieldKind::HyperlinkedIdentity => {
                wrap_many(basic(BasicType::Uri), field.many)
            }
            FieldKind::SlugRelated | FieldKind::StringRelated => {
                wrap_many(basic(BasicType::Str), field.many)
            }
            FieldKind::Choice { choices } => choice_schema(choices),
            FieldKind::MultipleChoice { choices } => Schema::array(choice_schema(choices)),
            FieldKind::List { child: None } => Schema::untyped_array(),
            FieldKind::List { child: Some(child) } => {
                let items = self.map_field(model, child, direction)?;
                let items = if matches!(child.kind, FieldKind::Nested { .. }) {
                    items
                } else {
                    Schema {
                        schema_type: items.schema_type,
                        format: items.format,
                        ..Default::default()
                    }
                };
                Schema::array(items)
            }
            FieldKind::Decimal {
                max_digits,
                decimal_places,
                coerce_to_string,
                min_value,
                max_value,
            } => {
                let coerce = coerce_to_string.unwrap_or(self.settings().coerce_decimal_to_string);
                let mut schema = if coerce {
                    Schema::typed("string", Some("decimal"))
                } else {
                    basic(BasicType::Decimal)
                };
                apply_decimal_bounds(&mut schema, *max_digits, *decimal_places);
                apply_min_max(&mut schema, min_value, max_value);
                schema
            }
            FieldKind::Integer {
                min_value,
                max_value,
            } => {
                let mut schema = basic(BasicType::Int);
                apply_min_max(&mut schema, min_value, max_value);
                let validator_bounds = field.validators.iter().filter_map(|v| match v {
                    Validator::MaxValue { limit } | Validator::MinValue { limit } => Some(limit),
                    _ => None,
                });
                let exceeds_int32 = min_value
                    .iter()
                    .chain(max_value.iter())
                    .chain(validator_bounds)
                    .any(|n| n.as_f64().is_some_and(|v| !(INT32_MIN..=INT32_MAX).contains(&v)));
                if exceeds_int32 {
                    schema.format = Some("int64".to_string());
                }
                schema
            }
            FieldKind::Float {
                min_value,
                max_value,
            } => {
                let mut schema = basic(BasicType::Float);
                apply_min_max(&mut schema, min_value, max_value);
                schema
            }
            FieldKind::File { use_url } => {
                let split = self.settings().component_split_request;
                if split && direction == Direction::Request {
                    basic(BasicType::File)
                } else if use_url.unwrap_or(self.settings().uploaded_files_use_url) {
                    basic(BasicType::Uri)
                } else {
                    basic(BasicType::File)
                }
            }
            FieldKind::IpAddress { protocol } => {
                match protocol.as_deref().map(str::to_lowercase).as_deref() {
                    Some("ipv4") => basic(BasicType::Ip4),
                    Some("ipv6") => basic(BasicType::Ip6),
                    _ => basic(BasicType::Str),
                }
            }
            FieldKind::Method { return_hint } => {
                self.map_type_hint(&field.name, return_hint.as_deref())?
            }
            FieldKind::ReadOnly => self.map_read_only(model, field, direction)?,
            FieldKind::Model {
                model: model_name,
                field: field_name,
            } => {
                let catalog = self.catalog();
                match catalog.model(model_name).and_then(|m| m.get_field(field_name).map(|f| (m, f))) {
                    Some((model, model_field)) => self.map_model_field(model, &model_field, direction)?,
                    None => {
                        self.diagnostics_mut().error(format!(
                            "field \"{}\" wraps unknown model field \"{}.{}\"; defaulting to \"string\"",
                            field.name, model_name, field_name
                        ));
                        basic(BasicType::Str)
                    }
                }
            }
            FieldKind::Boolean => basic(BasicType::Bool),
            FieldKind::Date => basic(BasicType::Date),
            FieldKind::DateTime => basic(BasicType::DateTime),
            FieldKind::Time => basic(BasicType::Time),
            FieldKind::Uuid => basic(BasicType::Uuid),
            FieldKind::Email => basic(BasicType::Email),
            FieldKind::Url => basic(BasicType::Uri),
            FieldKind::Json => basic(BasicType::Object),
            FieldKind::Char | FieldKind::Duration | FieldKind::Hidden => basic(BasicType::Str),
            FieldKind::Custom => {
                self.diagnostics_mut().warn(format!(
                    "could not resolve field \"{}\" of kind {:?}; defaulting to \"string\"",
                    field.name, field.class_path
                ));
                basic(BasicType::Str)
            }
        };
        Ok(schema)
    }

    fn map_nested(&mut self, field: &FieldDescriptor, key: &str, direction: Direction) -> Result<Schema> {
        let catalog = self.catalog();
        let Some(nested) = catalog.record(key) else {
            self.diagnostics_mut().error(format!(
                "field \"{}\" references unknown record \"{}\"; defaulting to a free-form object",
                field.name, key
            ));
            return Ok(Schema::free_form_object());
        };
        Ok(match self.resolve_record(nested, direction)? {
            Some(component) => component.ref_schema(),
            None => Schema::free_form_object(),
        })
    }

    /// Schema of the related model's primary key; relations are writable even
    /// when the key itself is not
    fn map_related_pk(
        &mut self,
        model: Option<&str>,
        related_model: Option<&str>,
        field: &FieldDescriptor,
        direction: Direction,
    ) -> Result<Schema> {
        let catalog = self.catalog();
        let target = related_model
            .and_then(|name| catalog.model(name))
            .or_else(|| model.and_then(|name| catalog.model(name)));
        let Some(target) = target else {
            self.diagnostics_mut().warn(format!(
                "could not find the related model of \"{}\"; defaulting to \"string\"",
                field.name
            ));
            return Ok(basic(BasicType::Str));
        };

        let mut schema = self.map_model_field(target, &target.pk(), direction)?;
        schema.read_only = None;
        Ok(schema)
    }

    fn map_read_only(
        &mut self,
        model: Option<&str>,
        field: &FieldDescriptor,
        direction: Direction,
    ) -> Result<Schema> {
        let catalog = self.catalog();
        let Some(model) = model.and_then(|name| catalog.model(name)) else {
            return Err(Error::InvariantViolation(format!(
                "read-only field \"{}\" belongs to a record without a known model",
                field.name
            )));
        };

        match follow_field_source(model, &field.source_path(), |name| catalog.model(name))? {
            SourceTarget::Field {
                model,
                field: model_field,
            } => self.map_model_field(model, model_field, direction),
            SourceTarget::Callable { property } => {
                self.map_type_hint(&property.name, property.return_hint.as_deref())
            }
        }
    }

    /// Schema of a storage model field, built the way a model serializer
    /// would build the matching field
    pub fn map_model_field(
        &mut self,
        model: &ModelDescriptor,
        model_field: &ModelField,
        direction: Direction,
    ) -> Result<Schema> {
        let built = match model_field.build_field() {
            Ok(built) => Some(built),
            Err(err) => {
                debug!("Falling back for model field {}.{}: {}", model.name, model_field.name, err);
                let catalog = self.catalog();
                if let Some(related) = model_field
                    .related_model
                    .as_deref()
                    .and_then(|name| catalog.model(name))
                {
                    return self.map_model_field(related, &related.pk(), direction);
                }
                model_field
                    .internal_type
                    .as_deref()
                    .and_then(|internal| model_field.build_field_as(internal).ok())
            }
        };

        match built {
            Some(built) => {
                let schema = self.map_field(Some(&model.name), &built, direction)?;
                Ok(append_meta(schema, &built))
            }
            None => {
                self.diagnostics_mut().error(format!(
                    "could not resolve model field \"{}.{}\" through its class lineage, its \
                     relation or its internal type; defaulting to \"string\"",
                    model.name, model_field.name
                ));
                Ok(basic(BasicType::Str))
            }
        }
    }

    fn map_type_hint(&mut self, owner: &str, hint: Option<&str>) -> Result<Schema> {
        let Some(hint) = hint else {
            self.diagnostics_mut().warn(format!(
                "type hint of \"{}\" is unknown; defaulting to \"string\"",
                owner
            ));
            return Ok(basic(BasicType::Str));
        };
        match parse_hint(hint) {
            Ok(parsed) => self.map_parsed_hint(owner, &parsed, hint),
            Err(err) => {
                self.diagnostics_mut().warn(format!(
                    "type hint \"{}\" of \"{}\" is invalid ({}); defaulting to \"string\"",
                    hint, owner, err
                ));
                Ok(basic(BasicType::Str))
            }
        }
    }

    fn map_parsed_hint(&mut self, owner: &str, parsed: &TypeHint, hint: &str) -> Result<Schema> {
        match parsed {
            TypeHint::Basic(basic_type) => Ok(basic_type.schema_or_string()),
            TypeHint::Optional(inner) => {
                let mut schema = self.map_parsed_hint(owner, inner, hint)?;
                schema.nullable = Some(true);
                Ok(schema)
            }
            TypeHint::List(inner) => Ok(Schema::array(self.map_parsed_hint(owner, inner, hint)?)),
            TypeHint::Named(name) => {
                let catalog = self.catalog();
                match catalog.record(name) {
                    Some(record) => Ok(match self.resolve_record(record, Direction::Response)? {
                        Some(component) => component.ref_schema(),
                        None => Schema::free_form_object(),
                    }),
                    None => {
                        self.diagnostics_mut().warn(format!(
                            "type hint \"{}\" of \"{}\" names no known record; defaulting to \"string\"",
                            hint, owner
                        ));
                        Ok(basic(BasicType::Str))
                    }
                }
            }
            TypeHint::Unsupported(_) => {
                self.diagnostics_mut().warn(format!(
                    "type hint \"{}\" of \"{}\" is not supported; defaulting to \"string\"",
                    hint, owner
                ));
                Ok(basic(BasicType::Str))
            }
        }
    }
}

fn basic(basic_type: BasicType) -> Schema {
    basic_type.schema_or_string()
}

fn wrap_many(schema: Schema, many: bool) -> Schema {
    if !many {
        return schema;
    }
    Schema::array(Schema {
        description: None,
        ..schema
    })
}

/// Enum schema; `type` is only set when every choice shares one JSON type
pub fn choice_schema(choices: &[Value]) -> Schema {
    let mut unique: Vec<Value> = Vec::with_capacity(choices.len());
    for choice in choices {
        if !unique.contains(choice) {
            unique.push(choice.clone());
        }
    }

    let all = |predicate: fn(&Value) -> bool| !unique.is_empty() && unique.iter().all(predicate);
    let schema_type = if all(Value::is_boolean) {
        Some("boolean")
    } else if all(|v| v.is_i64() || v.is_u64()) {
        Some("integer")
    } else if all(Value::is_number) {
        Some("number")
    } else if all(Value::is_string) {
        Some("string")
    } else {
        None
    };

    Schema {
        schema_type: schema_type.map(str::to_string),
        enum_values: Some(unique),
        ..Default::default()
    }
}

/// Attach the field-level keywords shared by every kind
pub fn append_meta(mut schema: Schema, field: &FieldDescriptor) -> Schema {
    if field.is_read_only() {
        schema.read_only = Some(true);
    }
    if field.write_only {
        schema.write_only = Some(true);
    }
    if field.nullable {
        schema.nullable = Some(true);
    }
    if let Some(default) = field.literal_default() {
        schema.default = Some(default.clone());
    }
    if let Some(help_text) = field.help_text.as_deref().filter(|h| !h.is_empty()) {
        schema.description = Some(help_text.to_string());
    }
    schema
}

/// Merge validator constraints into `schema`
pub fn apply_validators(mut schema: Schema, field: &FieldDescriptor) -> Schema {
    let is_list = matches!(field.kind, FieldKind::List { .. });
    for validator in &field.validators {
        match validator {
            Validator::Email => schema.format = Some("email".to_string()),
            Validator::Url => schema.format = Some("uri".to_string()),
            Validator::Regex { pattern } => schema.pattern = Some(pattern.clone()),
            Validator::MaxLength { limit } if is_list => schema.max_items = Some(*limit),
            Validator::MaxLength { limit } => schema.max_length = Some(*limit),
            Validator::MinLength { limit } if is_list => schema.min_items = Some(*limit),
            Validator::MinLength { limit } => schema.min_length = Some(*limit),
            Validator::MaxValue { limit } => schema.maximum = Some(limit.clone()),
            Validator::MinValue { limit } => schema.minimum = Some(limit.clone()),
            Validator::Decimal {
                max_digits,
                decimal_places,
            } => apply_decimal_bounds(&mut schema, *max_digits, *decimal_places),
        }
    }
    schema
}

fn apply_min_max(schema: &mut Schema, min_value: &Option<Number>, max_value: &Option<Number>) {
    if let Some(max) = max_value {
        schema.maximum = Some(max.clone());
    }
    if let Some(min) = min_value {
        schema.minimum = Some(min.clone());
    }
}

/// `multipleOf = 10^-places`, `maximum/minimum = ±(10^whole - 1)`
fn apply_decimal_bounds(schema: &mut Schema, max_digits: Option<u32>, decimal_places: Option<u32>) {
    if let Some(places) = decimal_places {
        schema.multiple_of = format!("1e-{}", places).parse().ok();
    }
    let whole = max_digits.map(|digits| digits.saturating_sub(decimal_places.unwrap_or(0)));
    if let Some(bound) = whole.filter(|w| *w > 0).and_then(digit_bound) {
        schema.minimum = negate(&bound);
        schema.maximum = Some(bound);
    }
}

fn digit_bound(whole: u32) -> Option<Number> {
    match 10i64.checked_pow(whole) {
        Some(power) => Some(Number::from(power - 1)),
        None => i32::try_from(whole)
            .ok()
            .and_then(|w| Number::from_f64(10f64.powi(w) - 1.0)),
    }
}

fn negate(number: &Number) -> Option<Number> {
    match number.as_i64() {
        Some(value) => Some(Number::from(-value)),
        None => number.as_f64().and_then(|value| Number::from_f64(-value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::extensions::FieldExtension;
    use crate::settings::Settings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn generate<F>(catalog: &Catalog, settings: &Settings, check: F)
    where
        F: FnOnce(&mut SchemaGenerator<'_>),
    {
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(catalog, settings, &extensions);
        check(&mut generator);
    }

    fn map(field: FieldDescriptor) -> Schema {
        let catalog = Catalog::new();
        let settings = Settings::default();
        let mut result = None;
        generate(&catalog, &settings, |generator| {
            let record = RecordDescriptor::new("app.X", "X");
            result = Some(generator.resolve_field(&record, &field, Direction::Response).unwrap());
        });
        result.unwrap()
    }

    fn integer(min: Option<i64>, max: Option<i64>) -> FieldKind {
        FieldKind::Integer {
            min_value: min.map(Number::from),
            max_value: max.map(Number::from),
        }
    }

    #[test]
    fn test_choice_typing() {
        assert_eq!(
            choice_schema(&[json!(1), json!(2), json!(1)]),
            Schema {
                schema_type: Some("integer".to_string()),
                enum_values: Some(vec![json!(1), json!(2)]),
                ..Default::default()
            }
        );
        let mixed = choice_schema(&[json!(1), json!(1.5)]);
        assert_eq!(mixed.schema_type.as_deref(), Some("number"));
        let strings = choice_schema(&[json!("a"), json!("b")]);
        assert_eq!(strings.schema_type.as_deref(), Some("string"));
        let bools = choice_schema(&[json!(true), json!(false)]);
        assert_eq!(bools.schema_type.as_deref(), Some("boolean"));
        let untyped = choice_schema(&[json!("a"), json!(1)]);
        assert!(untyped.schema_type.is_none());
        assert_eq!(untyped.enum_values.unwrap().len(), 2);
        assert!(choice_schema(&[]).schema_type.is_none());
    }

    #[test]
    fn test_decimal_multiple_of_and_bounds() {
        let field = FieldDescriptor::new(
            "price",
            FieldKind::Decimal {
                max_digits: Some(6),
                decimal_places: Some(2),
                coerce_to_string: None,
                min_value: None,
                max_value: None,
            },
        );
        let schema = map(field);
        assert_eq!(schema.schema_type.as_deref(), Some("string"));
        assert_eq!(schema.format.as_deref(), Some("decimal"));
        assert_eq!(schema.multiple_of, Some(0.01));
        assert_eq!(schema.maximum, Some(Number::from(9999)));
        assert_eq!(schema.minimum, Some(Number::from(-9999)));
    }

    #[test]
    fn test_decimal_without_coercion_is_number() {
        let field = FieldDescriptor::new(
            "ratio",
            FieldKind::Decimal {
                max_digits: None,
                decimal_places: Some(3),
                coerce_to_string: Some(false),
                min_value: None,
                max_value: Some(Number::from(1)),
            },
        );
        let schema = map(field);
        assert_eq!(schema.schema_type.as_deref(), Some("number"));
        assert_eq!(schema.multiple_of, Some(0.001));
        assert_eq!(schema.maximum, Some(Number::from(1)));
        assert!(schema.minimum.is_none());
    }

    #[test]
    fn test_integer_int64_detection() {
        let small = map(FieldDescriptor::new("a", integer(Some(0), Some(100))));
        assert!(small.format.is_none());
        assert_eq!(small.maximum, Some(Number::from(100)));

        let big = map(FieldDescriptor::new("b", integer(None, Some(2147483648))));
        assert_eq!(big.format.as_deref(), Some("int64"));

        let negative = map(FieldDescriptor::new("c", integer(Some(-2147483649), None)));
        assert_eq!(negative.format.as_deref(), Some("int64"));

        let validated = map(
            FieldDescriptor::new("d", integer(None, None)).with_validator(Validator::MaxValue {
                limit: Number::from(i64::MAX),
            }),
        );
        assert_eq!(validated.format.as_deref(), Some("int64"));
        assert_eq!(validated.maximum, Some(Number::from(i64::MAX)));
    }

    #[test]
    fn test_list_child_keeps_type_and_format_only() {
        let child = FieldDescriptor::new("c", integer(Some(0), Some(10))).with_help_text("child");
        let list = FieldDescriptor::new(
            "numbers",
            FieldKind::List {
                child: Some(Box::new(child)),
            },
        )
        .with_validator(Validator::MaxLength { limit: 5 });
        let schema = map(list);
        assert_eq!(schema.items.as_deref(), Some(&Schema::typed("integer", None)));
        assert_eq!(schema.max_items, Some(5));
        assert!(schema.max_length.is_none());

        let bare = map(FieldDescriptor::new("any", FieldKind::List { child: None }));
        assert_eq!(bare, Schema::untyped_array());
    }

    #[test]
    fn test_meta_is_attached() {
        let field = FieldDescriptor::new("title", FieldKind::Char)
            .nullable()
            .write_only()
            .with_default(json!("untitled"))
            .with_help_text("The title")
            .with_validator(Validator::Regex {
                pattern: "^[a-z]+$".to_string(),
            });
        let value = serde_json::to_value(map(field)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "string",
                "description": "The title",
                "writeOnly": true,
                "nullable": true,
                "default": "untitled",
                "pattern": "^[a-z]+$"
            })
        );
    }

    #[test]
    fn test_override_wins() {
        let field = FieldDescriptor::new("code", FieldKind::Char).with_override(FieldOverride::Basic(BasicType::Int64));
        assert_eq!(map(field), Schema::typed("integer", Some("int64")));

        let substitute = FieldDescriptor::new("code", FieldKind::Uuid);
        let field = FieldDescriptor::new("code", FieldKind::Custom)
            .with_override(FieldOverride::Field(Box::new(substitute)));
        assert_eq!(map(field), Schema::typed("string", Some("uuid")));
    }

    #[test]
    fn test_ip_address_protocols() {
        let v4 = map(FieldDescriptor::new(
            "ip",
            FieldKind::IpAddress {
                protocol: Some("IPv4".to_string()),
            },
        ));
        assert_eq!(v4.format.as_deref(), Some("ipv4"));
        let both = map(FieldDescriptor::new("ip", FieldKind::IpAddress { protocol: None }));
        assert_eq!(both, Schema::typed("string", None));
    }

    #[test]
    fn test_file_field_duality_on_split_request() {
        let catalog = Catalog::new();
        let settings = Settings {
            component_split_request: true,
            ..Default::default()
        };
        let record = RecordDescriptor::new("app.X", "X");
        let field = FieldDescriptor::new("file", FieldKind::File { use_url: None });
        generate(&catalog, &settings, |generator| {
            let response = generator.resolve_field(&record, &field, Direction::Response).unwrap();
            let request = generator.resolve_field(&record, &field, Direction::Request).unwrap();
            assert_eq!(response.format.as_deref(), Some("uri"));
            assert_eq!(request, Schema::typed("string", Some("binary")));
        });
    }

    #[test]
    fn test_unknown_kind_warns() {
        let catalog = Catalog::new();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.X", "X");
        let field = FieldDescriptor::new("geo", FieldKind::Custom).with_class_path(&["PointField"]);
        generate(&catalog, &settings, |generator| {
            let schema = generator.resolve_field(&record, &field, Direction::Response).unwrap();
            assert_eq!(schema, Schema::typed("string", None));
            assert_eq!(generator.diagnostics().warnings().count(), 1);
        });
    }

    struct PointExtension;

    impl FieldExtension for PointExtension {
        fn target(&self) -> &str {
            "PointField"
        }

        fn map_field(
            &self,
            _generator: &mut SchemaGenerator<'_>,
            _field: &FieldDescriptor,
            _direction: Direction,
        ) -> Result<Schema> {
            Ok(Schema::array(Schema::typed("number", Some("double"))))
        }
    }

    #[test]
    fn test_field_extension_gets_meta() {
        let catalog = Catalog::new();
        let settings = Settings::default();
        let mut extensions = ExtensionRegistry::new();
        extensions.register_field(Box::new(PointExtension));
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);

        let record = RecordDescriptor::new("app.X", "X");
        let field = FieldDescriptor::new("geo", FieldKind::Custom)
            .with_class_path(&["GeoPointField", "PointField"])
            .read_only();
        let schema = generator.resolve_field(&record, &field, Direction::Response).unwrap();
        assert_eq!(schema.schema_type.as_deref(), Some("array"));
        assert_eq!(schema.read_only, Some(true));
        assert!(generator.diagnostics().is_empty());
    }

    #[test]
    fn test_primary_key_relation_drops_read_only() {
        let mut catalog = Catalog::new();
        catalog.add_model(ModelDescriptor::new("M1")).unwrap();
        catalog
            .add_model(
                ModelDescriptor::new("M2")
                    .with_field(ModelField::new("m1_rw", &["ForeignKey"]).related_to("M1")),
            )
            .unwrap();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.M2Serializer", "M2Serializer").with_model("M2");
        let read_only = FieldDescriptor::new("m1_r", FieldKind::PrimaryKeyRelated { related_model: None }).read_only();
        let writable = FieldDescriptor::new(
            "m1_rw",
            FieldKind::PrimaryKeyRelated {
                related_model: Some("M1".to_string()),
            },
        );

        generate(&catalog, &settings, |generator| {
            let schema = generator.resolve_field(&record, &writable, Direction::Response).unwrap();
            assert_eq!(schema, Schema::typed("integer", None));
            let schema = generator.resolve_field(&record, &read_only, Direction::Response).unwrap();
            assert_eq!(schema.schema_type.as_deref(), Some("integer"));
            assert_eq!(schema.read_only, Some(true));
        });
    }

    #[test]
    fn test_many_relation_drops_child_description() {
        let mut catalog = Catalog::new();
        let mut pk = ModelField::new("code", &["CharField"]).primary_key();
        pk.help_text = Some("Tag code".to_string());
        catalog.add_model(ModelDescriptor::new("Tag").with_field(pk)).unwrap();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.X", "X");
        let field = FieldDescriptor::new(
            "tags",
            FieldKind::PrimaryKeyRelated {
                related_model: Some("Tag".to_string()),
            },
        )
        .many();

        generate(&catalog, &settings, |generator| {
            let schema = generator.resolve_field(&record, &field, Direction::Response).unwrap();
            assert_eq!(schema, Schema::array(Schema::typed("string", None)));
        });
    }

    #[test]
    fn test_pk_and_no_id() {
        let mut catalog = Catalog::new();
        let mut x_id = ModelField::new("id", &["UUIDField"]).primary_key();
        x_id.editable = false;
        catalog.add_model(ModelDescriptor::new("XModel").with_field(x_id)).unwrap();
        catalog
            .add_model(
                ModelDescriptor::new("YModel")
                    .with_field(ModelField::new("x", &["OneToOneField"]).primary_key().related_to("XModel")),
            )
            .unwrap();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.YSerializer", "YSerializer").with_model("YModel");
        let field = FieldDescriptor::new(
            "x",
            FieldKind::Model {
                model: "YModel".to_string(),
                field: "x".to_string(),
            },
        );

        generate(&catalog, &settings, |generator| {
            let schema = generator.resolve_field(&record, &field, Direction::Response).unwrap();
            assert_eq!(schema.format.as_deref(), Some("uuid"));
        });
    }

    #[test]
    fn test_custom_model_field_from_internal_type() {
        let mut catalog = Catalog::new();
        let mut custom = ModelField::new("custom_int_field", &["CustomIntegerField", "Field"]);
        custom.internal_type = Some("IntegerField".to_string());
        catalog
            .add_model(ModelDescriptor::new("CustomBaseFieldModel").with_field(custom))
            .unwrap();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.X", "X").with_model("CustomBaseFieldModel");
        let field = FieldDescriptor::new(
            "custom_int_field",
            FieldKind::Model {
                model: "CustomBaseFieldModel".to_string(),
                field: "custom_int_field".to_string(),
            },
        );

        generate(&catalog, &settings, |generator| {
            let schema = generator.resolve_field(&record, &field, Direction::Response).unwrap();
            assert_eq!(schema.schema_type.as_deref(), Some("integer"));
            assert!(generator.diagnostics().is_empty());
        });
    }

    #[test]
    fn test_unresolvable_model_field_is_error_diagnostic() {
        let mut catalog = Catalog::new();
        catalog
            .add_model(ModelDescriptor::new("Shape").with_field(ModelField::new("area", &["PolygonField"])))
            .unwrap();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.X", "X").with_model("Shape");
        let field = FieldDescriptor::new("area", FieldKind::ReadOnly);

        generate(&catalog, &settings, |generator| {
            let schema = generator.resolve_field(&record, &field, Direction::Response).unwrap();
            assert_eq!(schema.schema_type.as_deref(), Some("string"));
            assert_eq!(schema.read_only, Some(true));
            assert_eq!(generator.diagnostics().errors().count(), 1);
        });
    }

    #[test]
    fn test_follow_field_source_through_property() {
        let mut catalog = Catalog::new();
        catalog
            .add_model(ModelDescriptor::new("Model2").with_field(
                ModelField::new("y", &["IntegerField"]).with_choices(vec![json!(1), json!(2), json!(3)]),
            ))
            .unwrap();
        catalog
            .add_model(
                ModelDescriptor::new("Model1")
                    .with_property("prop", "Model2")
                    .with_property("total", "Option<i32>"),
            )
            .unwrap();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.X", "X").with_model("Model1");
        let prop = FieldDescriptor::new("prop", FieldKind::ReadOnly).with_source("prop.y");
        let total = FieldDescriptor::new("total", FieldKind::ReadOnly);

        generate(&catalog, &settings, |generator| {
            let schema = generator.resolve_field(&record, &prop, Direction::Response).unwrap();
            assert_eq!(schema.schema_type.as_deref(), Some("integer"));
            assert_eq!(schema.enum_values.as_ref().map(Vec::len), Some(3));
            assert_eq!(schema.read_only, Some(true));

            let schema = generator.resolve_field(&record, &total, Direction::Response).unwrap();
            assert_eq!(schema.format.as_deref(), Some("int32"));
            assert_eq!(schema.nullable, Some(true));
        });
    }

    #[test]
    fn test_read_only_without_model_is_invariant_violation() {
        let catalog = Catalog::new();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.X", "X");
        let field = FieldDescriptor::new("anything", FieldKind::ReadOnly);
        generate(&catalog, &settings, |generator| {
            let err = generator
                .resolve_field(&record, &field, Direction::Response)
                .unwrap_err();
            assert!(matches!(err, Error::InvariantViolation(_)));
        });
    }

    #[test]
    fn test_method_field_hints() {
        let mut catalog = Catalog::new();
        catalog
            .add_record(
                RecordDescriptor::new("shop.ItemSerializer", "ItemSerializer")
                    .with_field(FieldDescriptor::new("id", FieldKind::Uuid)),
            )
            .unwrap();
        let settings = Settings::default();
        let record = RecordDescriptor::new("app.X", "X");
        let method = |hint: &str| {
            FieldDescriptor::new(
                "computed",
                FieldKind::Method {
                    return_hint: Some(hint.to_string()),
                },
            )
        };

        generate(&catalog, &settings, |generator| {
            let schema = generator
                .resolve_field(&record, &method("f64"), Direction::Response)
                .unwrap();
            assert_eq!(schema.format.as_deref(), Some("double"));
            assert_eq!(schema.read_only, Some(true));

            let schema = generator
                .resolve_field(&record, &method("shop.ItemSerializer"), Direction::Response)
                .unwrap();
            assert_eq!(schema.reference.as_deref(), Some("#/components/schemas/Item"));

            let schema = generator
                .resolve_field(&record, &method("Result<i32, String>"), Direction::Response)
                .unwrap();
            assert_eq!(schema.schema_type.as_deref(), Some("string"));
            assert_eq!(generator.diagnostics().warnings().count(), 1);
        });
    }
}
