//! Run-scoped component registry.
//!
//! Components are keyed by identity (what was resolved) and bound to a unique
//! name (how it is referenced). Registering an identity twice returns the
//! first registration. Two identities asking for the same name never share it:
//! the later one is renamed with a numeric suffix.

use crate::diagnostics::Diagnostics;
use crate::schema::{Schema, SecurityScheme};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Schema,
    SecurityScheme,
}

/// Which variant of a record a schema component describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SchemaVariant {
    /// Request-direction schema under request/response splitting
    pub request: bool,
    /// All-optional partial-update schema
    pub patched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentity {
    pub kind: ComponentKind,
    /// Record type path or security scheme name
    pub object: String,
    pub variant: SchemaVariant,
}

impl ComponentIdentity {
    pub fn schema(object: impl Into<String>, variant: SchemaVariant) -> Self {
        Self {
            kind: ComponentKind::Schema,
            object: object.into(),
            variant,
        }
    }

    pub fn security_scheme(name: impl Into<String>) -> Self {
        Self {
            kind: ComponentKind::SecurityScheme,
            object: name.into(),
            variant: SchemaVariant::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentBody {
    Schema(Schema),
    SecurityScheme(SecurityScheme),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComponent {
    pub name: String,
    pub identity: ComponentIdentity,
    /// `None` while the component is still being resolved
    pub body: Option<ComponentBody>,
}

impl ResolvedComponent {
    pub fn kind(&self) -> ComponentKind {
        self.identity.kind
    }

    /// `$ref` pointing at this component
    pub fn ref_schema(&self) -> Schema {
        Schema::component_ref(&self.name)
    }

    pub fn schema(&self) -> Option<&Schema> {
        match &self.body {
            Some(ComponentBody::Schema(schema)) => Some(schema),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: IndexMap<ComponentIdentity, ResolvedComponent>,
    names: HashMap<(ComponentKind, String), ComponentIdentity>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &ComponentIdentity) -> Option<&ResolvedComponent> {
        self.components.get(identity)
    }

    pub fn contains(&self, identity: &ComponentIdentity) -> bool {
        self.components.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Register `identity` under `name`, or return its existing registration.
    pub fn register(
        &mut self,
        identity: ComponentIdentity,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> ResolvedComponent {
        if let Some(existing) = self.components.get(&identity) {
            return existing.clone();
        }

        let mut bound = name.to_string();
        let mut suffix = 2;
        while let Some(owner) = self.names.get(&(identity.kind, bound.clone())) {
            if suffix == 2 {
                diagnostics.warn(format!(
                    "component name \"{}\" is already used by \"{}\"; \"{}\" gets a numbered name",
                    name, owner.object, identity.object
                ));
            }
            bound = format!("{}{}", name, suffix);
            suffix += 1;
        }

        debug!("Registering component {} for {}", bound, identity.object);
        let component = ResolvedComponent {
            name: bound.clone(),
            identity: identity.clone(),
            body: None,
        };
        self.names.insert((identity.kind, bound), identity.clone());
        self.components.insert(identity, component.clone());
        component
    }

    /// Attach the resolved body to a registered component
    pub fn complete(
        &mut self,
        identity: &ComponentIdentity,
        body: ComponentBody,
    ) -> Option<ResolvedComponent> {
        let component = self.components.get_mut(identity)?;
        component.body = Some(body);
        Some(component.clone())
    }

    /// Drop a component and release its name
    pub fn evict(&mut self, identity: &ComponentIdentity) {
        if let Some(component) = self.components.shift_remove(identity) {
            debug!("Evicting component {}", component.name);
            self.names.remove(&(identity.kind, component.name));
        }
    }

    /// Completed components, each section sorted by name
    pub fn build(self) -> (IndexMap<String, Schema>, IndexMap<String, SecurityScheme>) {
        let mut schemas = IndexMap::new();
        let mut security_schemes = IndexMap::new();
        for component in self.components.into_values() {
            match component.body {
                Some(ComponentBody::Schema(schema)) => {
                    schemas.insert(component.name, schema);
                }
                Some(ComponentBody::SecurityScheme(scheme)) => {
                    security_schemes.insert(component.name, scheme);
                }
                None => debug!("Skipping unresolved component {}", component.name),
            }
        }
        schemas.sort_keys();
        security_schemes.sort_keys();
        (schemas, security_schemes)
    }
}
