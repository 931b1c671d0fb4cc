use crate::catalog::Catalog;
use crate::descriptor::{FieldKind, RecordDescriptor};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::extensions::ExtensionRegistry;
use crate::registry::{ComponentBody, ComponentIdentity, ComponentRegistry, ResolvedComponent, SchemaVariant};
use crate::route::HttpMethod;
use crate::schema::Schema;
use crate::settings::Settings;
use indexmap::IndexMap;
use log::debug;

/// Whether a schema describes data sent to or received from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Request,
    Response,
}

/// Schema generator - turns records and fields into schemas and components
///
/// One generator lives for one run. It owns the run's component registry and
/// diagnostics; catalog, settings and extensions are shared read-only.
pub struct SchemaGenerator<'a> {
    catalog: &'a Catalog,
    settings: &'a Settings,
    extensions: &'a ExtensionRegistry,
    registry: ComponentRegistry,
    diagnostics: Diagnostics,
    /// Method of the operation being built
    method: HttpMethod,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(catalog: &'a Catalog, settings: &'a Settings, extensions: &'a ExtensionRegistry) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            catalog,
            settings,
            extensions,
            registry: ComponentRegistry::new(),
            diagnostics: Diagnostics::new(),
            method: HttpMethod::Get,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn extensions(&self) -> &'a ExtensionRegistry {
        self.extensions
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Register a component, reporting renames to this run's diagnostics
    pub fn register_component(&mut self, identity: ComponentIdentity, name: &str) -> ResolvedComponent {
        self.registry.register(identity, name, &mut self.diagnostics)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    /// Hand over the registry and diagnostics accumulated during the run
    pub fn finish(self) -> (ComponentRegistry, Diagnostics) {
        (self.registry, self.diagnostics)
    }

    fn variant(&self, record: &RecordDescriptor, direction: Direction) -> SchemaVariant {
        let request = direction == Direction::Request;
        SchemaVariant {
            request: request && self.settings.component_split_request,
            patched: request
                && self.method == HttpMethod::Patch
                && self.settings.component_split_patch
                && !record.read_only,
        }
    }

    /// Component name of `record` for the current method and `direction`
    pub fn component_name(&self, record: &RecordDescriptor, direction: Direction) -> String {
        let mut name = if let Some(ref_name) = &record.ref_name {
            ref_name.clone()
        } else if let Some(name) = self
            .extensions
            .record_extension(record.lineage())
            .and_then(|e| e.name(record))
        {
            name
        } else {
            match record.name.strip_suffix("Serializer") {
                Some(stripped) if !stripped.is_empty() => stripped.to_string(),
                _ => record.name.clone(),
            }
        };

        let variant = self.variant(record, direction);
        if variant.patched {
            name = format!("Patched{}", name);
        }
        if variant.request {
            name.push_str("Request");
        }
        name
    }

    /// Resolve `record` into a registered component.
    ///
    /// Returns `None` when the record maps to an object without properties and
    /// without composition; such components are evicted again.
    pub fn resolve_record(
        &mut self,
        record: &RecordDescriptor,
        direction: Direction,
    ) -> Result<Option<ResolvedComponent>> {
        let identity = ComponentIdentity::schema(&record.type_path, self.variant(record, direction));
        if let Some(existing) = self.registry.get(&identity) {
            return Ok(Some(existing.clone()));
        }

        let name = self.component_name(record, direction);
        let component = self.register_component(identity.clone(), &name);
        debug!("Resolving record {} as {}", record.type_path, component.name);

        let schema = self.map_record(record, direction)?;
        if schema.is_composed() || schema.has_properties() {
            Ok(self.registry.complete(&identity, ComponentBody::Schema(schema)))
        } else {
            debug!("Discarding empty component {}", component.name);
            self.registry.evict(&identity);
            Ok(None)
        }
    }

    /// Object schema of `record`, without registering it
    pub fn map_record(&mut self, record: &RecordDescriptor, direction: Direction) -> Result<Schema> {
        let extensions: &'a ExtensionRegistry = self.extensions;
        let schema = match extensions.record_extension(record.lineage()) {
            Some(extension) => {
                debug!("Mapping record {} through extension {}", record.type_path, extension.target());
                extension.map_record(self, record, direction)?
            }
            None => self.map_basic_record(record, direction)?,
        };
        Ok(self.postprocess(schema, direction))
    }

    fn map_basic_record(&mut self, record: &RecordDescriptor, direction: Direction) -> Result<Schema> {
        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for field in &record.fields {
            if matches!(field.kind, FieldKind::Hidden) {
                continue;
            }
            let schema = self.resolve_field(record, field, direction)?;
            if field.is_required() || schema.is_read_only() {
                required.push(field.name.clone());
            }
            properties.insert(field.name.clone(), schema.safe_ref());
        }

        if self.variant(record, direction).patched {
            required.clear();
        }

        Ok(Schema::object(properties, required, record.description.clone()))
    }

    /// Strip properties that do not travel in `direction` when request and
    /// response components are split
    fn postprocess(&self, mut schema: Schema, direction: Direction) -> Schema {
        if !self.settings.component_split_request {
            return schema;
        }
        let Some(properties) = schema.properties.as_mut() else {
            return schema;
        };

        let stripped: Vec<String> = properties
            .iter()
            .filter(|(_, property)| match direction {
                Direction::Request => property.is_read_only(),
                Direction::Response => property.is_write_only(),
            })
            .map(|(name, _)| name.clone())
            .collect();
        for name in &stripped {
            properties.shift_remove(name);
        }

        if let Some(required) = schema.required.as_mut() {
            required.retain(|name| !stripped.contains(name));
            if required.is_empty() {
                schema.required = None;
            }
        }
        schema
    }
}
