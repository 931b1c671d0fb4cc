//! One route to one OpenAPI operation.
//!
//! [`OperationBuilder`] reads the route, its view and the route's explicit
//! overrides, and produces the operation's id, tags, description, security,
//! request body and responses. Parameters are resolved in [`crate::parameters`].

use crate::basic_types::BasicType;
use crate::error::Result;
use crate::extensions::{ExtensionRegistry, SecurityRequirement};
use crate::openapi_builder::{content_for, Operation, RequestBody, Response};
use crate::registry::{ComponentBody, ComponentIdentity};
use crate::route::{Body, HttpMethod, OperationOverride, ResponseSpec, RouteDescriptor, ViewDescriptor};
use crate::schema::Schema;
use crate::schema_generator::{Direction, SchemaGenerator};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;

const NO_RESPONSE_BODY: &str = "No response body";

/// Actions whose operationId token is derived from the method
const STANDARD_ACTIONS: [&str; 6] = ["list", "create", "retrieve", "update", "partial_update", "destroy"];

/// Builds the operation of one route
pub struct OperationBuilder<'g, 'a> {
    pub(crate) generator: &'g mut SchemaGenerator<'a>,
    pub(crate) route: &'a RouteDescriptor,
    pub(crate) view: &'a ViewDescriptor,
    path_prefix: Option<&'g Regex>,
}

impl<'g, 'a> OperationBuilder<'g, 'a> {
    pub fn new(
        generator: &'g mut SchemaGenerator<'a>,
        route: &'a RouteDescriptor,
        view: &'a ViewDescriptor,
        path_prefix: Option<&'g Regex>,
    ) -> Self {
        Self {
            generator,
            route,
            view,
            path_prefix,
        }
    }

    pub(crate) fn overrides(&self) -> Option<&'a OperationOverride> {
        self.route.schema_override.as_ref()
    }

    /// Build the operation; `None` when it had to be skipped
    pub fn build(mut self) -> Result<Option<Operation>> {
        debug!("Building operation {}", self.route.label());
        self.generator.set_method(self.route.method);

        if self.needs_view_serializer() && self.view.serializer.is_none() {
            self.generator.diagnostics_mut().error(format!(
                "unable to guess serializer for view \"{}\"; add a serializer or override the \
                 request and responses of this route. Skipping operation",
                self.view.name
            ));
            return Ok(None);
        }

        let overrides = self.overrides();
        let operation = Operation {
            operation_id: self.operation_id(),
            description: self.description(),
            parameters: self.resolve_parameters()?,
            tags: self.tags(),
            request_body: self.request_body()?,
            security: self.security(),
            deprecated: overrides.is_some_and(|o| o.deprecated),
            responses: self.responses()?,
        };
        Ok(Some(operation))
    }

    fn needs_view_serializer(&self) -> bool {
        let overrides = self.overrides();
        // DELETE answers 204 without consulting the serializer
        let responses_missing =
            self.route.method != HttpMethod::Delete && overrides.map_or(true, |o| o.responses.is_none());
        let request_missing = self.route.method.is_unsafe() && overrides.map_or(true, |o| o.request.is_none());
        responses_missing || request_missing
    }

    /// Response body deciding whether this operation returns a list
    fn main_response_body(&self) -> Option<&'a Body> {
        match self.overrides().and_then(|o| o.responses.as_ref()) {
            Some(ResponseSpec::Single(body)) => Some(body),
            Some(ResponseSpec::ByStatus(bodies)) => bodies
                .iter()
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, body)| body),
            None => self.view.serializer.as_ref(),
        }
    }

    /// Whether `body` is delivered as a list of objects.
    ///
    /// Partially heuristic; defaults to `false` when nothing is conclusive.
    pub(crate) fn is_list_view(&self, body: Option<&Body>) -> bool {
        match body {
            Some(Body::Record { many: Some(true), .. }) => return true,
            Some(Body::Basic { .. } | Body::Schema { .. } | Body::Empty) => return false,
            _ => {}
        }
        if let Some(action) = &self.route.action {
            return action == "list";
        }
        if self.route.method != HttpMethod::Get {
            return false;
        }
        if self.view.generic
            && self
                .route
                .path_variables()
                .contains(&self.view.lookup_variable())
        {
            return false;
        }
        self.view.list_mixin
    }

    pub(crate) fn is_list_operation(&self) -> bool {
        self.is_list_view(self.main_response_body())
    }

    /// Path segments without the configured prefix and without variables
    fn tokenize_path(&self) -> Vec<String> {
        let path = match self.path_prefix {
            Some(prefix) => prefix.replace_all(&self.route.path, "").into_owned(),
            None => self.route.path.clone(),
        };
        path.trim_matches('/')
            .split('/')
            .filter(|t| !t.is_empty() && !t.starts_with('{'))
            .map(str::to_string)
            .collect()
    }

    fn operation_id(&self) -> String {
        if let Some(operation_id) = self.overrides().and_then(|o| o.operation_id.clone()) {
            return operation_id;
        }

        let mut tokens: Vec<String> = self
            .tokenize_path()
            .into_iter()
            .map(|t| t.replace('-', "_"))
            .collect();

        if let Some(action) = self.route.action.as_deref().filter(|a| !STANDARD_ACTIONS.contains(a)) {
            let action = action.replace('-', "_");
            if tokens.last() != Some(&action) {
                tokens.push(action);
            }
            return tokens.join("_");
        }

        let action = match self.route.method {
            HttpMethod::Get if self.is_list_operation() => "list".to_string(),
            HttpMethod::Get => "retrieve".to_string(),
            HttpMethod::Post => "create".to_string(),
            HttpMethod::Put => "update".to_string(),
            HttpMethod::Patch => "partial_update".to_string(),
            HttpMethod::Delete => "destroy".to_string(),
            other => other.lowercase(),
        };
        tokens.push(action);
        tokens.join("_")
    }

    fn tags(&self) -> Vec<String> {
        if let Some(tags) = self.overrides().and_then(|o| o.tags.clone()) {
            return tags;
        }
        self.tokenize_path().into_iter().take(1).collect()
    }

    fn description(&self) -> Option<String> {
        if let Some(description) = self.overrides().and_then(|o| o.description.clone()) {
            return Some(description).filter(|d| !d.is_empty());
        }
        let action = self
            .route
            .action
            .clone()
            .unwrap_or_else(|| self.route.method.lowercase());
        self.view
            .action_docs
            .get(&action)
            .filter(|doc| !doc.is_empty())
            .or(self.view.description.as_ref())
            .filter(|doc| !doc.is_empty())
            .cloned()
    }

    fn security(&mut self) -> Vec<SecurityRequirement> {
        let extensions: &'a ExtensionRegistry = self.generator.extensions();
        let mut requirements = Vec::new();

        for authenticator in &self.view.authenticators {
            let Some(scheme) = extensions.authentication_extension(&authenticator.class_path) else {
                self.generator.diagnostics_mut().warn(format!(
                    "could not resolve authenticator \"{}\"; no authentication extension is \
                     registered for it. Ignoring",
                    authenticator.class_name()
                ));
                continue;
            };

            if let Some(requirement) = scheme.security_requirement() {
                requirements.push(requirement);
            }

            let identity = ComponentIdentity::security_scheme(scheme.name());
            if !self.generator.registry().contains(&identity) {
                self.generator.register_component(identity.clone(), scheme.name());
                self.generator
                    .registry_mut()
                    .complete(&identity, ComponentBody::SecurityScheme(scheme.security_definition()));
            }
        }

        let method = self.route.method;
        let safe = !matches!(method, HttpMethod::Put | HttpMethod::Patch | HttpMethod::Post);
        if self.view.allows_any() || (self.view.is_read_only_gated() && safe) {
            requirements.push(SecurityRequirement::new());
        }
        requirements
    }

    fn request_body(&mut self) -> Result<Option<RequestBody>> {
        if !self.route.method.is_unsafe() {
            return Ok(None);
        }
        let body = match self.overrides().and_then(|o| o.request.as_ref()) {
            Some(body) => body,
            None => match &self.view.serializer {
                Some(body) => body,
                None => return Ok(None),
            },
        };

        let (schema, required) = match body {
            Body::Empty => return Ok(None),
            Body::Basic { basic } => match basic.schema() {
                Some(schema) => (schema, false),
                None => return Ok(None),
            },
            Body::Schema { schema } => (schema.clone(), false),
            Body::Record { record, many } => {
                let catalog = self.generator.catalog();
                let Some(record) = catalog.record(record) else {
                    self.generator.diagnostics_mut().warn(format!(
                        "could not resolve request body record \"{}\"; defaulting to a generic \
                         free-form object",
                        record
                    ));
                    return Ok(Some(self.request_content(unspecified("Unspecified request body"), false)));
                };
                let Some(component) = self.generator.resolve_record(record, Direction::Request)? else {
                    return Ok(None);
                };
                if *many == Some(true) {
                    (Schema::array(component.ref_schema()), true)
                } else {
                    let required = component.schema().is_some_and(has_writable_required_property);
                    (component.ref_schema(), required)
                }
            }
        };
        Ok(Some(self.request_content(schema, required)))
    }

    fn request_content(&self, schema: Schema, required: bool) -> RequestBody {
        RequestBody {
            content: content_for(self.view.parsers.iter().cloned(), &schema),
            required,
        }
    }

    fn responses(&mut self) -> Result<IndexMap<String, Response>> {
        let mut responses = IndexMap::new();
        match self.overrides().and_then(|o| o.responses.as_ref()) {
            Some(ResponseSpec::Single(body)) => {
                responses.insert("200".to_string(), self.response_for(body)?);
            }
            Some(ResponseSpec::ByStatus(bodies)) => {
                for (code, body) in bodies {
                    responses.insert(code.0.clone(), self.response_for(body)?);
                }
            }
            None => {
                if self.route.method == HttpMethod::Delete {
                    responses.insert("204".to_string(), Response::empty(NO_RESPONSE_BODY));
                } else if let Some(body) = &self.view.serializer {
                    responses.insert("200".to_string(), self.response_for(body)?);
                }
            }
        }
        Ok(responses)
    }

    fn response_for(&mut self, body: &Body) -> Result<Response> {
        let mut record_many = None;
        let schema = match body {
            Body::Empty => return Ok(Response::empty(NO_RESPONSE_BODY)),
            Body::Basic { basic: BasicType::None } => return Ok(Response::empty(NO_RESPONSE_BODY)),
            Body::Basic { basic } => basic.schema_or_string(),
            Body::Schema { schema } => schema.clone(),
            Body::Record { record, .. } => {
                let catalog = self.generator.catalog();
                match catalog.record(record) {
                    Some(record) => {
                        record_many = record.many;
                        match self.generator.resolve_record(record, Direction::Response)? {
                            Some(component) => component.ref_schema(),
                            None => return Ok(Response::empty(NO_RESPONSE_BODY)),
                        }
                    }
                    None => {
                        self.generator.diagnostics_mut().warn(format!(
                            "could not resolve response record \"{}\"; defaulting to a generic \
                             free-form object",
                            record
                        ));
                        unspecified("Unspecified response body")
                    }
                }
            }
        };

        let body_many = match body {
            Body::Record { many, .. } => *many,
            _ => None,
        };
        let schema = if self.is_list_view(Some(body)) && body_many != Some(false) && record_many != Some(false) {
            let array = Schema::array(schema);
            match &self.view.pagination {
                Some(paginator) => paginator.paginated_response_schema(array),
                None => array,
            }
        } else {
            schema
        };

        Ok(Response::with_schema(self.view.renderers.iter().cloned(), &schema))
    }
}

fn unspecified(description: &str) -> Schema {
    Schema {
        description: Some(description.to_string()),
        ..Schema::free_form_object()
    }
}

/// A request body is required when some required property is writable
fn has_writable_required_property(schema: &Schema) -> bool {
    let Some(required) = &schema.required else {
        return false;
    };
    required.iter().any(|name| {
        !schema
            .properties
            .as_ref()
            .and_then(|p| p.get(name))
            .is_some_and(Schema::is_read_only)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::descriptor::{FieldDescriptor, FieldKind, RecordDescriptor};
    use crate::pagination::Paginator;
    use crate::route::{Authenticator, StatusCode};
    use crate::settings::Settings;
    use pretty_assertions::assert_eq;

    fn item_record() -> RecordDescriptor {
        RecordDescriptor::new("shop.ItemSerializer", "ItemSerializer")
            .with_model("Item")
            .with_field(
                FieldDescriptor::new(
                    "id",
                    FieldKind::Integer {
                        min_value: None,
                        max_value: None,
                    },
                )
                .read_only(),
            )
            .with_field(FieldDescriptor::new("name", FieldKind::Char))
    }

    fn viewset() -> ViewDescriptor {
        let mut view = ViewDescriptor::new("ItemViewSet").with_serializer(Body::record("shop.ItemSerializer"));
        view.generic = true;
        view.list_mixin = true;
        view.model = Some("Item".to_string());
        view
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_record(item_record()).unwrap();
        catalog
    }

    fn build(catalog: &Catalog, settings: &Settings, route: &RouteDescriptor, view: &ViewDescriptor) -> Option<Operation> {
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(catalog, settings, &extensions);
        let prefix = settings.path_prefix().unwrap();
        OperationBuilder::new(&mut generator, route, view, prefix.as_ref())
            .build()
            .unwrap()
    }

    fn list_view_of(route: &RouteDescriptor, view: &ViewDescriptor) -> bool {
        let catalog = Catalog::new();
        let settings = Settings::default();
        let extensions = ExtensionRegistry::new();
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);
        OperationBuilder::new(&mut generator, route, view, None).is_list_operation()
    }

    #[test]
    fn test_list_heuristic() {
        let view = viewset();
        assert!(list_view_of(&RouteDescriptor::new("/items/", HttpMethod::Get, "v"), &view));
        assert!(!list_view_of(&RouteDescriptor::new("/items/{pk}/", HttpMethod::Get, "v"), &view));
        assert!(!list_view_of(&RouteDescriptor::new("/items/", HttpMethod::Delete, "v"), &view));
        assert!(!list_view_of(&RouteDescriptor::new("/items/", HttpMethod::Post, "v"), &view));
        assert!(!list_view_of(
            &RouteDescriptor::new("/items/", HttpMethod::Get, "v").with_action("retrieve"),
            &view
        ));

        let mut plain = viewset();
        plain.list_mixin = false;
        assert!(!list_view_of(&RouteDescriptor::new("/items/", HttpMethod::Get, "v"), &plain));

        let mut many = viewset();
        many.serializer = Some(Body::record_list("shop.ItemSerializer"));
        assert!(list_view_of(&RouteDescriptor::new("/items/{pk}/", HttpMethod::Post, "v"), &many));
    }

    #[test]
    fn test_list_heuristic_uses_lowest_status_code() {
        let mut bodies = IndexMap::new();
        bodies.insert(StatusCode::from("404"), Body::Basic { basic: BasicType::Str });
        bodies.insert(StatusCode::from("200"), Body::record_list("shop.ItemSerializer"));
        let route = RouteDescriptor::new("/items/", HttpMethod::Post, "v").with_override(OperationOverride {
            responses: Some(ResponseSpec::ByStatus(bodies)),
            ..Default::default()
        });
        assert!(list_view_of(&route, &viewset()));
    }

    #[test]
    fn test_operation_ids_and_tags() {
        let catalog = catalog();
        let settings = Settings {
            schema_path_prefix: "^/api/v[0-9]+".to_string(),
            ..Default::default()
        };
        let view = viewset();

        let list = build(&catalog, &settings, &RouteDescriptor::new("/API/v1/shop-items/", HttpMethod::Get, "v"), &view).unwrap();
        assert_eq!(list.operation_id, "shop_items_list");
        assert_eq!(list.tags, vec!["shop-items".to_string()]);

        let partial = build(
            &catalog,
            &settings,
            &RouteDescriptor::new("/api/v1/shop-items/{pk}/", HttpMethod::Patch, "v"),
            &view,
        )
        .unwrap();
        assert_eq!(partial.operation_id, "shop_items_partial_update");

        let head = build(&catalog, &settings, &RouteDescriptor::new("/api/v1/ping/", HttpMethod::Head, "v"), &view).unwrap();
        assert_eq!(head.operation_id, "ping_head");

        let named = RouteDescriptor::new("/api/v1/items/", HttpMethod::Get, "v").with_override(OperationOverride {
            operation_id: Some("listEverything".to_string()),
            tags: Some(vec!["custom".to_string()]),
            ..Default::default()
        });
        let named = build(&catalog, &settings, &named, &view).unwrap();
        assert_eq!(named.operation_id, "listEverything");
        assert_eq!(named.tags, vec!["custom".to_string()]);
    }

    #[test]
    fn test_list_response_is_wrapped_and_paginated() {
        let catalog = catalog();
        let settings = Settings::default();
        let mut view = viewset();
        view.pagination = Some(Paginator::LimitOffset);

        let operation = build(&catalog, &settings, &RouteDescriptor::new("/items/", HttpMethod::Get, "v"), &view).unwrap();
        let schema = &operation.responses["200"].content.as_ref().unwrap()["application/json"].schema;
        let results = &schema.properties.as_ref().unwrap()["results"];
        assert_eq!(results, &Schema::array(Schema::component_ref("Item")));
        let names: Vec<&str> = operation.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["limit", "offset"]);
    }

    #[test]
    fn test_record_many_false_keeps_list_unwrapped() {
        let mut envelope = item_record();
        envelope.type_path = "shop.EnvelopeSerializer".to_string();
        envelope.name = "EnvelopeSerializer".to_string();
        envelope.many = Some(false);
        let mut catalog = catalog();
        catalog.add_record(envelope).unwrap();
        let settings = Settings::default();
        let view = viewset().with_serializer(Body::record("shop.EnvelopeSerializer"));

        let operation = build(&catalog, &settings, &RouteDescriptor::new("/x/", HttpMethod::Get, "v"), &view).unwrap();
        assert_eq!(operation.operation_id, "x_list");
        let schema = &operation.responses["200"].content.as_ref().unwrap()["application/json"].schema;
        assert_eq!(schema, &Schema::component_ref("Envelope"));
    }

    #[test]
    fn test_request_body_requirement() {
        let catalog = catalog();
        let settings = Settings::default();
        let view = viewset();

        let create = build(&catalog, &settings, &RouteDescriptor::new("/items/", HttpMethod::Post, "v"), &view).unwrap();
        let body = create.request_body.unwrap();
        assert!(body.required);
        assert_eq!(
            body.content.keys().collect::<Vec<_>>(),
            vec!["application/json", "application/x-www-form-urlencoded", "multipart/form-data"]
        );
        assert_eq!(body.content["application/json"].schema, Schema::component_ref("Item"));
        assert_eq!(create.responses["200"].description, "");

        let patch = build(&catalog, &settings, &RouteDescriptor::new("/items/{pk}/", HttpMethod::Patch, "v"), &view).unwrap();
        let body = patch.request_body.unwrap();
        assert!(!body.required);
        assert_eq!(body.content["application/json"].schema, Schema::component_ref("PatchedItem"));

        let retrieve = build(&catalog, &settings, &RouteDescriptor::new("/items/{pk}/", HttpMethod::Get, "v"), &view).unwrap();
        assert!(retrieve.request_body.is_none());
    }

    #[test]
    fn test_list_request_body_is_required_array() {
        let catalog = catalog();
        let settings = Settings::default();
        let route = RouteDescriptor::new("/x/", HttpMethod::Put, "v").with_override(OperationOverride {
            request: Some(Body::record_list("shop.ItemSerializer")),
            ..Default::default()
        });
        let operation = build(&catalog, &settings, &route, &viewset()).unwrap();
        assert_eq!(operation.operation_id, "x_update");
        let body = operation.request_body.unwrap();
        assert!(body.required);
        assert_eq!(
            body.content["application/json"].schema,
            Schema::array(Schema::component_ref("Item"))
        );
    }

    #[test]
    fn test_delete_has_no_response_body() {
        let catalog = catalog();
        let settings = Settings::default();
        let operation = build(&catalog, &settings, &RouteDescriptor::new("/items/{pk}/", HttpMethod::Delete, "v"), &viewset()).unwrap();
        assert_eq!(operation.operation_id, "items_destroy");
        let response = &operation.responses["204"];
        assert_eq!(response.description, "No response body");
        assert!(response.content.is_none());
    }

    #[test]
    fn test_status_keyed_responses() {
        let mut catalog = catalog();
        catalog
            .add_record(
                RecordDescriptor::new("shop.ErrorSerializer", "ErrorSerializer")
                    .with_field(FieldDescriptor::new("detail", FieldKind::Char)),
            )
            .unwrap();
        let settings = Settings::default();
        let mut bodies = IndexMap::new();
        bodies.insert(StatusCode::from("200"), Body::record("shop.ItemSerializer"));
        bodies.insert(StatusCode::from("404"), Body::record("shop.ErrorSerializer"));
        let route = RouteDescriptor::new("/items/", HttpMethod::Post, "v").with_override(OperationOverride {
            responses: Some(ResponseSpec::ByStatus(bodies)),
            ..Default::default()
        });

        let operation = build(&catalog, &settings, &route, &viewset()).unwrap();
        assert_eq!(operation.responses.keys().collect::<Vec<_>>(), vec!["200", "404"]);
        let schema_of = |code: &str| operation.responses[code].content.as_ref().unwrap()["application/json"].schema.clone();
        assert_eq!(schema_of("200"), Schema::component_ref("Item"));
        assert_eq!(schema_of("404"), Schema::component_ref("Error"));
    }

    #[test]
    fn test_security_requirements() {
        let catalog = catalog();
        let settings = Settings::default();
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);
        let mut view = viewset();
        view.authenticators = vec![Authenticator::new("TokenAuthentication"), Authenticator::new("OAuth2Authentication")];
        view.permissions = vec![crate::route::IS_AUTHENTICATED_OR_READ_ONLY.to_string()];

        let get = RouteDescriptor::new("/items/", HttpMethod::Get, "v");
        let operation = OperationBuilder::new(&mut generator, &get, &view, None).build().unwrap().unwrap();
        assert_eq!(operation.security.len(), 2);
        assert!(operation.security[0].contains_key("tokenAuth"));
        assert!(operation.security[1].is_empty());

        let post = RouteDescriptor::new("/items/", HttpMethod::Post, "v");
        let operation = OperationBuilder::new(&mut generator, &post, &view, None).build().unwrap().unwrap();
        assert_eq!(operation.security.len(), 1);

        assert_eq!(generator.diagnostics().warnings().count(), 2);
        let (registry, _) = generator.finish();
        let (_, schemes) = registry.build();
        assert_eq!(schemes.keys().collect::<Vec<_>>(), vec!["tokenAuth"]);
    }

    #[test]
    fn test_missing_serializer_skips_operation() {
        let catalog = catalog();
        let settings = Settings::default();
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);
        let view = ViewDescriptor::new("BareView");

        let route = RouteDescriptor::new("/bare/", HttpMethod::Get, "BareView");
        let built = OperationBuilder::new(&mut generator, &route, &view, None).build().unwrap();
        assert!(built.is_none());
        assert_eq!(generator.diagnostics().errors().count(), 1);

        let overridden = route.clone().with_override(OperationOverride {
            responses: Some(ResponseSpec::Single(Body::Basic { basic: BasicType::Float })),
            ..Default::default()
        });
        let built = OperationBuilder::new(&mut generator, &overridden, &view, None)
            .build()
            .unwrap()
            .unwrap();
        assert_eq!(built.operation_id, "bare_retrieve");
        let schema = &built.responses["200"].content.as_ref().unwrap()["application/json"].schema;
        assert_eq!(schema, &Schema::typed("number", Some("float")));
    }

    #[test]
    fn test_custom_action_operation_id() {
        let catalog = catalog();
        let settings = Settings::default();
        let view = viewset();

        let publish = RouteDescriptor::new("/items/{pk}/publish/", HttpMethod::Post, "v").with_action("publish");
        assert_eq!(build(&catalog, &settings, &publish, &view).unwrap().operation_id, "items_publish");

        let export = RouteDescriptor::new("/items/", HttpMethod::Get, "v").with_action("bulk-export");
        assert_eq!(build(&catalog, &settings, &export, &view).unwrap().operation_id, "items_bulk_export");

        let retrieve = RouteDescriptor::new("/items/{pk}/", HttpMethod::Get, "v").with_action("retrieve");
        assert_eq!(build(&catalog, &settings, &retrieve, &view).unwrap().operation_id, "items_retrieve");
    }

    #[test]
    fn test_delete_without_serializer() {
        let catalog = catalog();
        let settings = Settings::default();
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);
        let view = ViewDescriptor::new("LogoutView");

        let route = RouteDescriptor::new("/session/", HttpMethod::Delete, "LogoutView");
        let built = OperationBuilder::new(&mut generator, &route, &view, None)
            .build()
            .unwrap()
            .unwrap();
        assert_eq!(built.operation_id, "session_destroy");
        assert_eq!(built.responses.keys().collect::<Vec<_>>(), vec!["204"]);
        assert!(built.responses["204"].content.is_none());
        assert!(built.request_body.is_none());
        assert!(generator.diagnostics().is_empty());
    }

    #[test]
    fn test_description_prefers_action_doc() {
        let catalog = catalog();
        let settings = Settings::default();
        let mut view = viewset();
        view.description = Some("Items in the shop.".to_string());
        view.action_docs.insert("list".to_string(), "All items.".to_string());

        let list = RouteDescriptor::new("/items/", HttpMethod::Get, "v").with_action("list");
        assert_eq!(build(&catalog, &settings, &list, &view).unwrap().description.as_deref(), Some("All items."));

        let retrieve = RouteDescriptor::new("/items/{pk}/", HttpMethod::Get, "v").with_action("retrieve");
        assert_eq!(
            build(&catalog, &settings, &retrieve, &view).unwrap().description.as_deref(),
            Some("Items in the shop.")
        );
    }
}
