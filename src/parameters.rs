//! Operation parameters: path variables, filter backends, pagination and
//! explicit overrides, merged into one list.

use crate::error::Result;
use crate::model::ModelField;
use crate::openapi_builder::Parameter;
use crate::operation::OperationBuilder;
use crate::route::{HttpMethod, OverrideParameter, ParameterLocation, ParameterSpec};
use crate::schema::Schema;
use crate::schema_generator::Direction;
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Query filtering supported by a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterBackend {
    /// `?search=`
    Search,
    /// `?ordering=`
    Ordering,
    /// Backend describing its own parameters
    Declared { parameters: Vec<ParameterSpec> },
}

const FILTER_ACTIONS: [&str; 5] = ["list", "retrieve", "update", "partial_update", "destroy"];

const CONVERTER_PATTERN: &str = r"<(?:(?P<converter>[^>:]+):)?(?P<parameter>\w+)>";
const NAMED_GROUP_PATTERN: &str = r"\(\?P<(?P<parameter>\w+)>(?P<pattern>[^)]*)\)";

static CONVERTERS: OnceLock<Option<Regex>> = OnceLock::new();
static NAMED_GROUPS: OnceLock<Option<Regex>> = OnceLock::new();

fn converters() -> Option<&'static Regex> {
    CONVERTERS.get_or_init(|| Regex::new(CONVERTER_PATTERN).ok()).as_ref()
}

fn named_groups() -> Option<&'static Regex> {
    NAMED_GROUPS.get_or_init(|| Regex::new(NAMED_GROUP_PATTERN).ok()).as_ref()
}
const FORMAT_SUFFIX_CONVERTER: &str = "drf_format_suffix";

type ParameterKey = (String, ParameterLocation);

fn key_of(parameter: &Parameter) -> ParameterKey {
    (parameter.name.clone(), parameter.location)
}

impl<'g, 'a> OperationBuilder<'g, 'a> {
    /// All parameters of the operation, sorted by name.
    ///
    /// Precedence on (name, location) clashes: overrides, then path variables,
    /// then filters, then pagination.
    pub(crate) fn resolve_parameters(&mut self) -> Result<Vec<Parameter>> {
        let mut parameters: IndexMap<ParameterKey, Parameter> = IndexMap::new();
        for parameter in self.override_parameters()? {
            parameters.insert(key_of(&parameter), parameter);
        }

        let variables: Vec<&'a str> = self
            .route
            .path_variables()
            .into_iter()
            .filter(|v| !parameters.contains_key(&(v.to_string(), ParameterLocation::Path)))
            .collect();

        let resolved = self.path_parameters(&variables)?;
        let filters = self.filter_parameters()?;
        let pagination = self.pagination_parameters();
        for parameter in resolved.into_iter().chain(filters).chain(pagination) {
            parameters.entry(key_of(&parameter)).or_insert(parameter);
        }

        let mut parameters: Vec<Parameter> = parameters.into_values().collect();
        parameters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parameters)
    }

    fn override_parameters(&mut self) -> Result<Vec<Parameter>> {
        let Some(overrides) = self.overrides() else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        for parameter in &overrides.parameters {
            match parameter {
                OverrideParameter::Parameter(spec) => result.push(self.declared_parameter(spec)?),
                OverrideParameter::Explode { explode } => result.extend(self.exploded_parameters(explode)?),
            }
        }
        Ok(result)
    }

    fn declared_parameter(&mut self, spec: &ParameterSpec) -> Result<Parameter> {
        let mut schema = if let Some(basic) = spec.basic {
            basic.schema_or_string()
        } else if let Some(key) = &spec.record {
            let catalog = self.generator.catalog();
            match catalog.record(key) {
                Some(record) => match self.generator.resolve_record(record, Direction::Request)? {
                    Some(component) => component.ref_schema(),
                    None => Schema::free_form_object(),
                },
                None => {
                    self.generator.diagnostics_mut().warn(format!(
                        "parameter \"{}\" references unknown record \"{}\"; defaulting to \"string\"",
                        spec.name, key
                    ));
                    Schema::typed("string", None)
                }
            }
        } else if let Some(schema) = &spec.schema {
            schema.clone()
        } else {
            Schema::typed("string", None)
        };
        if let Some(values) = &spec.enum_values {
            schema.enum_values = Some(values.clone());
        }

        let mut parameter = Parameter::new(spec.name.clone(), spec.location, schema)
            .with_required(spec.required || spec.location == ParameterLocation::Path);
        parameter.description = spec.description.clone().filter(|d| !d.is_empty());
        parameter.deprecated = spec.deprecated;
        Ok(parameter)
    }

    /// One query parameter per property of the record
    fn exploded_parameters(&mut self, key: &str) -> Result<Vec<Parameter>> {
        let catalog = self.generator.catalog();
        let Some(record) = catalog.record(key) else {
            self.generator.diagnostics_mut().warn(format!(
                "could not resolve parameter record \"{}\"; skipping",
                key
            ));
            return Ok(Vec::new());
        };

        let schema = self.generator.map_record(record, Direction::Request)?;
        let required = schema.required.unwrap_or_default();
        Ok(schema
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|(name, property)| {
                let is_required = required.contains(&name);
                Parameter::new(name, ParameterLocation::Query, property).with_required(is_required)
            })
            .collect())
    }

    fn path_parameters(&mut self, variables: &[&str]) -> Result<Vec<Parameter>> {
        let catalog = self.generator.catalog();
        let model = self.view.model.as_deref().and_then(|name| catalog.model(name));
        let mut parameters = Vec::new();

        for variable in variables {
            let mut schema = Schema::typed("string", None);
            let mut description = String::new();
            let mut required = true;

            if let Some((resolved, is_required)) = self
                .route
                .path_regex
                .as_deref()
                .and_then(|regex| resolve_regex_path_parameter(regex, variable))
            {
                schema = resolved;
                required = is_required;
            } else if let Some(model) = model {
                let model_field: Option<ModelField> = if *variable == "pk" {
                    Some(model.pk())
                } else {
                    model.get_field(variable)
                };
                match model_field {
                    Some(model_field) => {
                        let mapped = self
                            .generator
                            .map_model_field(model, &model_field, Direction::Response)?;
                        schema = Schema {
                            read_only: None,
                            write_only: None,
                            nullable: None,
                            default: None,
                            ..mapped
                        };
                        if schema.description.is_none() && model_field.primary_key {
                            description = model.pk_description(&model_field);
                        }
                    }
                    None => self.generator.diagnostics_mut().warn(format!(
                        "could not derive type of path parameter \"{}\" because model \"{}\" has \
                         no such field; defaulting to \"string\"",
                        variable, model.name
                    )),
                }
            } else {
                self.generator.diagnostics_mut().warn(format!(
                    "could not derive type of path parameter \"{}\" because view \"{}\" has no \
                     known model; defaulting to \"string\"",
                    variable, self.view.name
                ));
            }

            parameters.push(
                Parameter::new(*variable, ParameterLocation::Path, schema)
                    .with_description(description)
                    .with_required(required),
            );
        }
        Ok(parameters)
    }

    fn allows_filters(&self) -> bool {
        if self.view.filter_backends.is_none() {
            return false;
        }
        match &self.route.action {
            Some(action) => FILTER_ACTIONS.contains(&action.as_str()),
            None => matches!(
                self.route.method,
                HttpMethod::Get | HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete
            ),
        }
    }

    fn filter_parameters(&mut self) -> Result<Vec<Parameter>> {
        if !self.allows_filters() {
            return Ok(Vec::new());
        }
        let backends: &'a [FilterBackend] = self.view.filter_backends.as_deref().unwrap_or_default();

        let mut parameters = Vec::new();
        for backend in backends {
            match backend {
                FilterBackend::Search => parameters.push(
                    Parameter::new("search", ParameterLocation::Query, Schema::typed("string", None))
                        .with_description("A search term."),
                ),
                FilterBackend::Ordering => parameters.push(
                    Parameter::new("ordering", ParameterLocation::Query, Schema::typed("string", None))
                        .with_description("Which field to use when ordering the results."),
                ),
                FilterBackend::Declared { parameters: specs } => {
                    for spec in specs {
                        parameters.push(self.declared_parameter(spec)?);
                    }
                }
            }
        }
        Ok(parameters)
    }

    fn pagination_parameters(&self) -> Vec<Parameter> {
        if !self.is_list_operation() {
            return Vec::new();
        }
        match &self.view.pagination {
            Some(paginator) => paginator.parameters(),
            None => Vec::new(),
        }
    }
}

/// Type a path variable from the route pattern: `<converter:name>` segments
/// and `(?P<name>...)` groups. Returns the schema and whether the parameter is
/// required.
pub fn resolve_regex_path_parameter(path_regex: &str, variable: &str) -> Option<(Schema, bool)> {
    let groups = named_groups()?;
    if let Some(captures) = groups
        .captures_iter(path_regex)
        .find(|c| &c["parameter"] == variable)
    {
        let pattern = &captures["pattern"];
        debug!("Path variable {} is a regex group {}", variable, pattern);
        return matches!(pattern, r"\d+" | "[0-9]+").then(|| (Schema::typed("integer", None), true));
    }

    let captures = converters()?
        .captures_iter(path_regex)
        .find(|c| &c["parameter"] == variable)?;
    let converter = captures.name("converter").map_or("str", |m| m.as_str());
    debug!("Path variable {} uses converter {}", variable, converter);

    let resolved = match converter {
        "int" => (Schema::typed("integer", None), true),
        "str" | "slug" | "path" => (Schema::typed("string", None), true),
        "uuid" => (Schema::typed("string", Some("uuid")), true),
        FORMAT_SUFFIX_CONVERTER => (Schema::typed("string", None), false),
        other => {
            let suffixes = other.strip_prefix(FORMAT_SUFFIX_CONVERTER)?.strip_prefix('_')?;
            let values: Vec<Value> = suffixes
                .split('_')
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(format!(".{}", s)))
                .collect();
            let schema = Schema {
                enum_values: Some(values),
                ..Schema::typed("string", None)
            };
            (schema, false)
        }
    };
    Some(resolved)
}
