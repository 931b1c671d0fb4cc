//! OpenAPI schema fragments.
//!
//! [`Schema`] is a typed subset of the OpenAPI 3.0 Schema Object covering every
//! keyword the generator emits. Unknown keywords (from extensions or appended
//! components) are kept verbatim in [`Schema::extra`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
pub const SECURITY_SCHEME_REF_PREFIX: &str = "#/components/securitySchemes/";

/// OpenAPI Schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Reference to a component
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Keywords not modelled above, passed through untouched
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

/// Discriminator object for `oneOf` unions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// OpenAPI Security Scheme object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

impl Schema {
    /// A schema with only `type` (and optionally `format`) set
    pub fn typed(schema_type: &str, format: Option<&str>) -> Self {
        Schema {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Default::default()
        }
    }

    /// `$ref` to a component schema
    pub fn component_ref(name: &str) -> Self {
        Schema {
            reference: Some(format!("{}{}", SCHEMA_REF_PREFIX, name)),
            ..Default::default()
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// Array without an `items` constraint
    pub fn untyped_array() -> Self {
        Schema::typed("array", None)
    }

    /// Object with arbitrary keys (`additionalProperties: {}`)
    pub fn free_form_object() -> Self {
        Schema {
            schema_type: Some("object".to_string()),
            additional_properties: Some(Box::default()),
            ..Default::default()
        }
    }

    /// Object schema; `required` is emitted sorted and omitted when empty
    pub fn object(
        properties: IndexMap<String, Schema>,
        mut required: Vec<String>,
        description: Option<String>,
    ) -> Self {
        required.sort();
        required.dedup();
        Schema {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required)
            },
            description: description.filter(|d| !d.is_empty()),
            ..Default::default()
        }
    }

    /// Whether the schema composes other schemas via `oneOf`/`allOf`/`anyOf`
    pub fn is_composed(&self) -> bool {
        self.one_of.is_some() || self.all_of.is_some() || self.any_of.is_some()
    }

    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only == Some(true)
    }

    pub fn is_write_only(&self) -> bool {
        self.write_only == Some(true)
    }

    /// Component name a `$ref` points to, if this is a schema reference
    pub fn referenced_component(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(SCHEMA_REF_PREFIX))
    }

    /// `$ref` siblings are ignored in OpenAPI 3.0, so a reference that carries
    /// other keywords is moved into a single-element `allOf`.
    pub fn safe_ref(self) -> Self {
        let Some(reference) = self.reference.clone() else {
            return self;
        };
        let bare = Schema {
            reference: Some(reference),
            ..Default::default()
        };
        if self == bare {
            return self;
        }
        Schema {
            reference: None,
            all_of: Some(vec![bare]),
            ..self
        }
    }
}
