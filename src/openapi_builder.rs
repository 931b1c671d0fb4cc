use crate::registry::ComponentRegistry;
use crate::route::{HttpMethod, ParameterLocation};
use crate::schema::{Schema, SecurityScheme};
use crate::extensions::SecurityRequirement;
use crate::error::Result;
use crate::settings::Settings;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OPENAPI_VERSION: &str = "3.0.3";

/// OpenAPI document builder
pub struct OpenApiBuilder {
    /// OpenAPI info section
    info: Info,
    /// Paths collection (path template -> PathItem), in route order
    paths: IndexMap<String, PathItem>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
        }
    }

    fn slot(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
        }
    }
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters (path, query, header, cookie), sorted by name
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Alternative security requirements; an empty entry means anonymous access
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub security: Vec<SecurityRequirement>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub deprecated: bool,
    /// Status code -> response
    pub responses: IndexMap<String, Response>,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub schema: Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub deprecated: bool,
}

impl Parameter {
    /// Path parameters are required, everything else is optional
    pub fn new(name: impl Into<String>, location: ParameterLocation, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location,
            schema,
            description: None,
            required: location == ParameterLocation::Path,
            deprecated: false,
        }
    }

    /// Set the description; empty strings are dropped
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Media type -> media type object
pub type Content = IndexMap<String, MediaType>;

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub content: Content,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub required: bool,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

impl Response {
    /// Response carrying `schema` under every media type
    pub fn with_schema<I, S>(media_types: I, schema: &Schema) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Response {
            description: String::new(),
            content: Some(content_for(media_types, schema)),
        }
    }

    /// Response without a body
    pub fn empty(description: impl Into<String>) -> Self {
        Response {
            description: description.into(),
            content: None,
        }
    }
}

/// Same schema under each media type
pub fn content_for<I, S>(media_types: I, schema: &Schema) -> Content
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    media_types
        .into_iter()
        .map(|media_type| {
            (
                media_type.into(),
                MediaType {
                    schema: schema.clone(),
                },
            )
        })
        .collect()
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub security_schemes: IndexMap<String, SecurityScheme>,
    /// Other sections, only ever filled from appended components
    #[serde(flatten)]
    pub extra: IndexMap<String, IndexMap<String, Value>>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.security_schemes.is_empty() && self.extra.is_empty()
    }

    /// Merge raw components verbatim; entries replace generated ones of the
    /// same name
    pub fn append(&mut self, appended: &IndexMap<String, IndexMap<String, Value>>) -> Result<()> {
        for (section, entries) in appended {
            for (name, raw) in entries {
                debug!("Appending component {}/{}", section, name);
                match section.as_str() {
                    "schemas" => {
                        self.schemas
                            .insert(name.clone(), serde_json::from_value(raw.clone())?);
                    }
                    "securitySchemes" => {
                        self.security_schemes
                            .insert(name.clone(), serde_json::from_value(raw.clone())?);
                    }
                    _ => {
                        self.extra
                            .entry(section.clone())
                            .or_default()
                            .insert(name.clone(), raw.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub paths: IndexMap<String, PathItem>,
    #[serde(skip_serializing_if = "Components::is_empty", default)]
    pub components: Components,
}

impl OpenApiDocument {
    /// Operation at `path` for `method`
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.operation(method))
    }
}

impl OpenApiBuilder {
    /// Builder with the document info taken from `settings`
    pub fn new(settings: &Settings) -> Self {
        debug!("Initializing OpenApiBuilder");
        Self {
            info: Info {
                title: settings.title.clone(),
                version: settings.version.clone(),
                description: settings.description.clone().filter(|d| !d.is_empty()),
            },
            paths: IndexMap::new(),
        }
    }

    /// Add an operation; a second operation for the same path and method
    /// replaces the first
    pub fn add_operation(&mut self, path: &str, method: HttpMethod, operation: Operation) {
        debug!("Adding operation: {} {}", method.as_str(), path);
        let slot = self.paths.entry(path.to_string()).or_default().slot(method);
        if slot.is_some() {
            debug!("Replacing earlier operation for {} {}", method.as_str(), path);
        }
        *slot = Some(operation);
    }

    /// Build the final OpenAPI document from the run's registry, then merge
    /// the appended components
    pub fn build(
        self,
        registry: ComponentRegistry,
        appended: &IndexMap<String, IndexMap<String, Value>>,
    ) -> Result<OpenApiDocument> {
        debug!("Building final OpenAPI document");
        let (schemas, security_schemes) = registry.build();
        let mut components = Components {
            schemas,
            security_schemes,
            extra: IndexMap::new(),
        };
        components.append(appended)?;

        Ok(OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info,
            paths: self.paths,
            components,
        })
    }
}
