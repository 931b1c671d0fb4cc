//! Field and record descriptors.
//!
//! A record descriptor is the static description of one data shape: an ordered
//! list of named fields plus naming metadata. Field kinds form a closed set;
//! anything outside of it deserializes as [`FieldKind::Custom`] and is handled
//! through the extension registry or the string fallback.

use crate::basic_types::BasicType;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Description of a single field of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Class lineage, most specific first; used for extension lookup
    #[serde(default)]
    pub class_path: Vec<String>,
    /// Multi-valued relation or nested record
    #[serde(default)]
    pub many: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub write_only: bool,
    #[serde(default)]
    pub nullable: bool,
    /// Explicit requiredness; derived from `read_only` and `default` when absent
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub validators: Vec<Validator>,
    /// Dotted attribute path on the record's model; defaults to the field name
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "override", with = "serde_yaml::with::singleton_map")]
    pub override_: Option<FieldOverride>,
}

/// Declared default of a field
///
/// Written as `default: {value: ...}` or `default: callable` in both YAML and JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Value(Value),
    /// Computed at runtime; never rendered into the schema
    Callable,
}

/// Replacement for the automatic mapping of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOverride {
    Basic(BasicType),
    Field(Box<FieldDescriptor>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Char,
    Integer {
        #[serde(default)]
        min_value: Option<Number>,
        #[serde(default)]
        max_value: Option<Number>,
    },
    Float {
        #[serde(default)]
        min_value: Option<Number>,
        #[serde(default)]
        max_value: Option<Number>,
    },
    Decimal {
        #[serde(default)]
        max_digits: Option<u32>,
        #[serde(default)]
        decimal_places: Option<u32>,
        /// Falls back to `COERCE_DECIMAL_TO_STRING` when unset
        #[serde(default)]
        coerce_to_string: Option<bool>,
        #[serde(default)]
        min_value: Option<Number>,
        #[serde(default)]
        max_value: Option<Number>,
    },
    Boolean,
    Date,
    DateTime,
    Time,
    Duration,
    Uuid,
    Email,
    Url,
    IpAddress {
        /// `ipv4`, `ipv6` or `both`
        #[serde(default)]
        protocol: Option<String>,
    },
    File {
        /// Falls back to `UPLOADED_FILES_USE_URL` when unset
        #[serde(default)]
        use_url: Option<bool>,
    },
    Json,
    /// Relation rendered as the related model's primary key
    PrimaryKeyRelated {
        #[serde(default)]
        related_model: Option<String>,
    },
    HyperlinkedRelated,
    HyperlinkedIdentity,
    SlugRelated,
    StringRelated,
    Choice {
        choices: Vec<Value>,
    },
    MultipleChoice {
        choices: Vec<Value>,
    },
    List {
        /// `None` for an unvalidated child
        #[serde(default)]
        child: Option<Box<FieldDescriptor>>,
    },
    Nested {
        record: String,
    },
    /// Value computed by a method; typed through its return hint
    Method {
        #[serde(default)]
        return_hint: Option<String>,
    },
    /// Attribute read straight from the model through `source`
    ReadOnly,
    /// Thin wrapper over a model field
    Model {
        model: String,
        field: String,
    },
    /// Present on the model but never serialized
    Hidden,
    #[serde(other)]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Validator {
    Email,
    Url,
    Regex { pattern: String },
    MaxLength { limit: u64 },
    MinLength { limit: u64 },
    MaxValue { limit: Number },
    MinValue { limit: Number },
    Decimal {
        #[serde(default)]
        max_digits: Option<u32>,
        #[serde(default)]
        decimal_places: Option<u32>,
    },
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            class_path: Vec::new(),
            many: false,
            read_only: false,
            write_only: false,
            nullable: false,
            required: None,
            default: None,
            help_text: None,
            validators: Vec::new(),
            source: None,
            override_: None,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(DefaultValue::Value(default));
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_class_path(mut self, class_path: &[&str]) -> Self {
        self.class_path = class_path.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_override(mut self, field_override: FieldOverride) -> Self {
        self.override_ = Some(field_override);
        self
    }

    /// Computed kinds are never writable, whatever the flag says
    pub fn is_read_only(&self) -> bool {
        self.read_only
            || matches!(
                self.kind,
                FieldKind::ReadOnly | FieldKind::Method { .. } | FieldKind::HyperlinkedIdentity
            )
    }

    /// Read-only fields and fields with a default are optional unless stated otherwise
    pub fn is_required(&self) -> bool {
        self.required
            .unwrap_or(!self.is_read_only() && self.default.is_none())
    }

    /// Model attribute path this field reads from
    pub fn source_path(&self) -> Vec<&str> {
        self.source
            .as_deref()
            .unwrap_or(&self.name)
            .split('.')
            .collect()
    }

    /// Literal default value, if any
    pub fn literal_default(&self) -> Option<&Value> {
        match &self.default {
            Some(DefaultValue::Value(value)) if !value.is_null() => Some(value),
            _ => None,
        }
    }
}

/// Description of one data shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    /// Unique identity, e.g. a fully qualified type path
    pub type_path: String,
    /// Declared type name, e.g. `ItemSerializer`
    pub name: String,
    /// Base class lineage, most specific first
    #[serde(default)]
    pub class_path: Vec<String>,
    /// Explicit component name
    #[serde(default)]
    pub ref_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Backing model, used for relations and read-only sources
    #[serde(default)]
    pub model: Option<String>,
    /// The whole record is read-only
    #[serde(default)]
    pub read_only: bool,
    /// `false` keeps list responses of this record unwrapped, e.g. for envelopes
    #[serde(default)]
    pub many: Option<bool>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub polymorphic: Option<PolymorphicSpec>,
}

/// Union of candidate records selected by a discriminator field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolymorphicSpec {
    pub component_name: String,
    /// Candidate record type paths
    pub records: Vec<String>,
    pub resource_type_field_name: String,
}

pub const POLYMORPHIC_PROXY: &str = "PolymorphicProxySerializer";

impl RecordDescriptor {
    pub fn new(type_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            name: name.into(),
            class_path: Vec::new(),
            ref_name: None,
            description: None,
            model: None,
            read_only: false,
            many: None,
            fields: Vec::new(),
            polymorphic: None,
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_ref_name(mut self, ref_name: impl Into<String>) -> Self {
        self.ref_name = Some(ref_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Record acting as a discriminated union of `records`
    pub fn polymorphic(
        type_path: impl Into<String>,
        component_name: impl Into<String>,
        records: Vec<String>,
        resource_type_field_name: impl Into<String>,
    ) -> Self {
        let component_name = component_name.into();
        let mut record = Self::new(type_path, POLYMORPHIC_PROXY);
        record.class_path = vec![POLYMORPHIC_PROXY.to_string()];
        record.polymorphic = Some(PolymorphicSpec {
            component_name,
            records,
            resource_type_field_name: resource_type_field_name.into(),
        });
        record
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Identity followed by the class lineage, most specific first
    pub fn lineage(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.type_path.as_str())
            .chain(std::iter::once(self.name.as_str()))
            .chain(self.class_path.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_defaults() {
        let plain = FieldDescriptor::new("a", FieldKind::Char);
        assert!(plain.is_required());

        let read_only = FieldDescriptor::new("b", FieldKind::Char).read_only();
        assert!(!read_only.is_required());

        let defaulted = FieldDescriptor::new("c", FieldKind::Char).with_default(json!("x"));
        assert!(!defaulted.is_required());

        let forced = FieldDescriptor::new("d", FieldKind::Char)
            .read_only()
            .with_required(true);
        assert!(forced.is_required());

        let computed = FieldDescriptor::new("e", FieldKind::Method { return_hint: None });
        assert!(computed.is_read_only());
        assert!(!computed.is_required());
    }

    #[test]
    fn test_deserialize_flattened_kind() {
        let field: FieldDescriptor = serde_yaml::from_str(
            "name: price\ntype: decimal\nmax_digits: 6\ndecimal_places: 2\nread_only: true\n",
        )
        .unwrap();

        assert_eq!(field.name, "price");
        assert!(field.read_only);
        assert_eq!(
            field.kind,
            FieldKind::Decimal {
                max_digits: Some(6),
                decimal_places: Some(2),
                coerce_to_string: None,
                min_value: None,
                max_value: None,
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_custom() {
        let field: FieldDescriptor =
            serde_yaml::from_str("name: geo\ntype: point\nclass_path: [PointField]\n").unwrap();
        assert_eq!(field.kind, FieldKind::Custom);
        assert_eq!(field.class_path, vec!["PointField".to_string()]);
    }

    #[test]
    fn test_override_and_validators() {
        let field: FieldDescriptor = serde_yaml::from_str(
            r#"
name: code
type: char
override:
  basic: int
validators:
  - type: max_length
    limit: 10
  - type: regex
    pattern: "^[A-Z]+$"
"#,
        )
        .unwrap();
        assert_eq!(field.override_, Some(FieldOverride::Basic(BasicType::Int)));
        assert_eq!(field.validators.len(), 2);
        assert_eq!(field.validators[0], Validator::MaxLength { limit: 10 });
    }

    #[test]
    fn test_default_and_override_as_maps() {
        let fields: Vec<FieldDescriptor> = serde_yaml::from_str(
            r#"
- name: kind
  type: char
  default:
    value: cat
- name: created
  type: date_time
  default: callable
- name: code
  type: char
  override:
    field:
      name: code
      type: integer
      read_only: true
"#,
        )
        .unwrap();

        assert_eq!(fields[0].literal_default(), Some(&json!("cat")));
        assert!(!fields[0].is_required());
        assert_eq!(fields[1].default, Some(DefaultValue::Callable));
        assert_eq!(fields[1].literal_default(), None);
        match &fields[2].override_ {
            Some(FieldOverride::Field(substitute)) => {
                assert!(substitute.read_only);
                assert!(matches!(substitute.kind, FieldKind::Integer { .. }));
            }
            other => panic!("unexpected override: {:?}", other),
        }

        let from_json: FieldDescriptor = serde_json::from_str(
            r#"{"name": "kind", "type": "char", "default": {"value": "dog"}, "override": {"basic": "str"}}"#,
        )
        .unwrap();
        assert_eq!(from_json.literal_default(), Some(&json!("dog")));
        assert_eq!(from_json.override_, Some(FieldOverride::Basic(BasicType::Str)));
    }

    #[test]
    fn test_default_survives_yaml_round_trip() {
        let field = FieldDescriptor::new("kind", FieldKind::Char)
            .with_default(json!("cat"))
            .with_override(FieldOverride::Basic(BasicType::Int));

        let yaml = serde_yaml::to_string(&field).unwrap();
        assert!(yaml.contains("value: cat"), "{}", yaml);
        let reparsed: FieldDescriptor = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(reparsed, field);
    }

    #[test]
    fn test_source_path() {
        let field = FieldDescriptor::new("owner_name", FieldKind::ReadOnly).with_source("owner.name");
        assert_eq!(field.source_path(), vec!["owner", "name"]);

        let field = FieldDescriptor::new("title", FieldKind::ReadOnly);
        assert_eq!(field.source_path(), vec!["title"]);
    }

    #[test]
    fn test_polymorphic_record_lineage() {
        let record = RecordDescriptor::polymorphic(
            "app.PetProxy",
            "Pet",
            vec!["app.Cat".to_string(), "app.Dog".to_string()],
            "kind",
        );
        let lineage: Vec<&str> = record.lineage().collect();
        assert_eq!(
            lineage,
            vec!["app.PetProxy", POLYMORPHIC_PROXY, POLYMORPHIC_PROXY]
        );
    }
}
