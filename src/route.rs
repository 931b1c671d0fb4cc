//! Routes, views and per-operation overrides.

use crate::basic_types::BasicType;
use crate::pagination::Paginator;
use crate::parameters::FilterBackend;
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One operation of the API: a path template served by a view for one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Path template, e.g. `/items/{id}/`
    pub path: String,
    /// Original route pattern, used to type path variables
    #[serde(default)]
    pub path_regex: Option<String>,
    pub method: HttpMethod,
    /// Name of the view handling this route
    pub view: String,
    /// Viewset action, e.g. `list` or `retrieve`
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, rename = "override")]
    pub schema_override: Option<OperationOverride>,
}

/// HTTP methods an operation can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "delete")]
    Delete,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "options")]
    Options,
    #[serde(alias = "head")]
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    pub fn lowercase(&self) -> String {
        self.as_str().to_lowercase()
    }

    /// Methods that may carry a request body
    pub fn is_unsafe(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// Request or response body declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Body {
    Record {
        record: String,
        /// `true` wraps the body in an array, `false` suppresses list detection
        #[serde(default)]
        many: Option<bool>,
    },
    Basic {
        #[serde(rename = "type")]
        basic: BasicType,
    },
    /// Literal schema used as-is
    Schema { schema: Schema },
    /// Explicitly no body
    Empty,
}

impl Body {
    pub fn record(type_path: impl Into<String>) -> Self {
        Body::Record {
            record: type_path.into(),
            many: None,
        }
    }

    pub fn record_list(type_path: impl Into<String>) -> Self {
        Body::Record {
            record: type_path.into(),
            many: Some(true),
        }
    }
}

/// Status code key of a response override; YAML integers are accepted
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StatusCode(pub String);

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u64),
            Text(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Code(code) => StatusCode(code.to_string()),
            Raw::Text(text) => StatusCode(text),
        })
    }
}

impl From<&str> for StatusCode {
    fn from(code: &str) -> Self {
        StatusCode(code.to_string())
    }
}

/// Response override: one body for the default status, or one per status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseSpec {
    Single(Body),
    ByStatus(IndexMap<StatusCode, Body>),
}

/// Explicit operation settings that take precedence over introspection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationOverride {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<OverrideParameter>,
    #[serde(default)]
    pub request: Option<Body>,
    #[serde(default)]
    pub responses: Option<ResponseSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideParameter {
    Parameter(ParameterSpec),
    /// Every property of the record becomes a query parameter
    Explode { explode: String },
}

/// The location of a parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    #[default]
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// Declared parameter; typed by a basic type, a record or a literal schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(rename = "type", default)]
    pub basic: Option<BasicType>,
    #[serde(default)]
    pub record: Option<String>,
    #[serde(default)]
    pub schema: Option<Schema>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub deprecated: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, basic: BasicType, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            basic: Some(basic),
            record: None,
            schema: None,
            required: false,
            description: None,
            enum_values: None,
            deprecated: false,
        }
    }
}

/// Authenticator attached to a view, by class lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AuthenticatorRepr")]
pub struct Authenticator {
    pub class_path: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthenticatorRepr {
    Name(String),
    Lineage { class_path: Vec<String> },
}

impl From<AuthenticatorRepr> for Authenticator {
    fn from(repr: AuthenticatorRepr) -> Self {
        match repr {
            AuthenticatorRepr::Name(name) => Authenticator {
                class_path: vec![name],
            },
            AuthenticatorRepr::Lineage { class_path } => Authenticator { class_path },
        }
    }
}

impl Authenticator {
    pub fn new(class: &str) -> Self {
        Self {
            class_path: vec![class.to_string()],
        }
    }

    pub fn class_name(&self) -> &str {
        self.class_path.first().map(String::as_str).unwrap_or("")
    }
}

pub const ALLOW_ANY: &str = "AllowAny";
pub const IS_AUTHENTICATED_OR_READ_ONLY: &str = "IsAuthenticatedOrReadOnly";

/// Handler of one or more routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Documentation of individual actions or methods, keyed by action name
    /// (`list`, `retrieve`, custom actions) or lowercase method
    #[serde(default)]
    pub action_docs: IndexMap<String, String>,
    /// Body used for both request and response unless overridden
    #[serde(default)]
    pub serializer: Option<Body>,
    /// Model of the view's queryset
    #[serde(default)]
    pub model: Option<String>,
    /// Whether the view supports lookups by `lookup_field`
    #[serde(default)]
    pub generic: bool,
    /// Whether the view mixes in list behaviour
    #[serde(default)]
    pub list_mixin: bool,
    #[serde(default = "default_lookup_field")]
    pub lookup_field: String,
    #[serde(default)]
    pub lookup_url_kwarg: Option<String>,
    #[serde(default = "default_authenticators")]
    pub authenticators: Vec<Authenticator>,
    #[serde(default = "default_permissions")]
    pub permissions: Vec<String>,
    #[serde(default = "default_parsers")]
    pub parsers: Vec<String>,
    #[serde(default = "default_renderers")]
    pub renderers: Vec<String>,
    #[serde(default)]
    pub filter_backends: Option<Vec<FilterBackend>>,
    #[serde(default)]
    pub pagination: Option<Paginator>,
}

fn default_lookup_field() -> String {
    "pk".to_string()
}

fn default_authenticators() -> Vec<Authenticator> {
    vec![
        Authenticator::new("SessionAuthentication"),
        Authenticator::new("BasicAuthentication"),
    ]
}

fn default_permissions() -> Vec<String> {
    vec![ALLOW_ANY.to_string()]
}

fn default_parsers() -> Vec<String> {
    vec![
        "application/json".to_string(),
        "application/x-www-form-urlencoded".to_string(),
        "multipart/form-data".to_string(),
    ]
}

fn default_renderers() -> Vec<String> {
    vec!["application/json".to_string()]
}

impl ViewDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            action_docs: IndexMap::new(),
            serializer: None,
            model: None,
            generic: false,
            list_mixin: false,
            lookup_field: default_lookup_field(),
            lookup_url_kwarg: None,
            authenticators: default_authenticators(),
            permissions: default_permissions(),
            parsers: default_parsers(),
            renderers: default_renderers(),
            filter_backends: None,
            pagination: None,
        }
    }

    pub fn with_serializer(mut self, body: Body) -> Self {
        self.serializer = Some(body);
        self
    }

    /// Path variable identifying a single object
    pub fn lookup_variable(&self) -> &str {
        self.lookup_url_kwarg.as_deref().unwrap_or(&self.lookup_field)
    }

    pub fn allows_any(&self) -> bool {
        self.permissions.iter().any(|p| p == ALLOW_ANY)
    }

    pub fn is_read_only_gated(&self) -> bool {
        self.permissions
            .iter()
            .any(|p| p == IS_AUTHENTICATED_OR_READ_ONLY)
    }
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, method: HttpMethod, view: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            path_regex: None,
            method,
            view: view.into(),
            action: None,
            schema_override: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_override(mut self, schema_override: OperationOverride) -> Self {
        self.schema_override = Some(schema_override);
        self
    }

    /// Variables of the path template, in order of appearance
    pub fn path_variables(&self) -> Vec<&str> {
        let mut variables = Vec::new();
        let mut rest = self.path.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            if !name.is_empty() && !variables.contains(&name) {
                variables.push(name);
            }
            rest = &rest[start + len + 1..];
        }
        variables
    }

    /// `GET /items/{id}/`, used as diagnostics context
    pub fn label(&self) -> String {
        format!("{} {}", self.method.as_str(), self.path)
    }
}
