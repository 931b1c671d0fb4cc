//! Pluggable handlers for field kinds, record kinds and authenticators.
//!
//! Handlers are registered once, keyed by the class name they target, and
//! looked up by walking an object's class lineage from the most specific
//! entry to the least specific one. The first registered target wins.
//!
//! # Example
//!
//! ```
//! use openapi_from_descriptors::extensions::{ExtensionRegistry, RecordExtension};
//! use openapi_from_descriptors::descriptor::RecordDescriptor;
//! use openapi_from_descriptors::error::Result;
//! use openapi_from_descriptors::schema::Schema;
//! use openapi_from_descriptors::schema_generator::{Direction, SchemaGenerator};
//!
//! struct Opaque;
//!
//! impl RecordExtension for Opaque {
//!     fn target(&self) -> &str {
//!         "OpaqueSerializer"
//!     }
//!
//!     fn map_record(
//!         &self,
//!         _generator: &mut SchemaGenerator<'_>,
//!         _record: &RecordDescriptor,
//!         _direction: Direction,
//!     ) -> Result<Schema> {
//!         Ok(Schema::free_form_object())
//!     }
//! }
//!
//! let mut extensions = ExtensionRegistry::with_builtins();
//! extensions.register_record(Box::new(Opaque));
//! assert!(extensions.record_extension(["OpaqueSerializer"]).is_some());
//! ```

pub mod authentication;
pub mod polymorphic;

use crate::descriptor::{FieldDescriptor, RecordDescriptor};
use crate::error::Result;
use crate::schema::{Schema, SecurityScheme};
use crate::schema_generator::{Direction, SchemaGenerator};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;

/// Security requirement object: scheme name to required scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Replaces the built-in mapping of a field kind
pub trait FieldExtension {
    /// Class name this extension handles
    fn target(&self) -> &str;

    /// Schema for `field`; shared field metadata is attached by the caller
    fn map_field(
        &self,
        generator: &mut SchemaGenerator<'_>,
        field: &FieldDescriptor,
        direction: Direction,
    ) -> Result<Schema>;
}

/// Replaces the built-in object mapping of a record kind
pub trait RecordExtension {
    fn target(&self) -> &str;

    /// Component name overriding the record's own name
    fn name(&self, _record: &RecordDescriptor) -> Option<String> {
        None
    }

    fn map_record(
        &self,
        generator: &mut SchemaGenerator<'_>,
        record: &RecordDescriptor,
        direction: Direction,
    ) -> Result<Schema>;
}

/// Maps an authenticator class to a security scheme
pub trait AuthenticationExtension {
    fn target(&self) -> &str;

    /// Name of the security scheme component
    fn name(&self) -> &str;

    fn security_definition(&self) -> SecurityScheme;

    /// Requirement added to operations using this authenticator
    fn security_requirement(&self) -> Option<SecurityRequirement> {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(self.name().to_string(), Vec::new());
        Some(requirement)
    }
}

/// Extension lookup table, built once and shared by reference between runs
#[derive(Default)]
pub struct ExtensionRegistry {
    fields: HashMap<String, Box<dyn FieldExtension>>,
    records: HashMap<String, Box<dyn RecordExtension>>,
    authenticators: HashMap<String, Box<dyn AuthenticationExtension>>,
}

impl ExtensionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with polymorphic composition and the standard authenticators
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_record(Box::new(polymorphic::PolymorphicProxyExtension));
        registry.register_authenticator(Box::new(authentication::SessionScheme));
        registry.register_authenticator(Box::new(authentication::BasicScheme));
        registry.register_authenticator(Box::new(authentication::TokenScheme));
        registry.register_authenticator(Box::new(authentication::JwtScheme));
        registry
    }

    pub fn register_field(&mut self, extension: Box<dyn FieldExtension>) {
        debug!("Registering field extension for {}", extension.target());
        self.fields.insert(extension.target().to_string(), extension);
    }

    pub fn register_record(&mut self, extension: Box<dyn RecordExtension>) {
        debug!("Registering record extension for {}", extension.target());
        self.records.insert(extension.target().to_string(), extension);
    }

    pub fn register_authenticator(&mut self, extension: Box<dyn AuthenticationExtension>) {
        debug!("Registering authentication extension for {}", extension.target());
        self.authenticators
            .insert(extension.target().to_string(), extension);
    }

    pub fn field_extension<I, S>(&self, lineage: I) -> Option<&dyn FieldExtension>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lineage
            .into_iter()
            .find_map(|class| self.fields.get(class.as_ref()))
            .map(|e| e.as_ref())
    }

    pub fn record_extension<I, S>(&self, lineage: I) -> Option<&dyn RecordExtension>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lineage
            .into_iter()
            .find_map(|class| self.records.get(class.as_ref()))
            .map(|e| e.as_ref())
    }

    pub fn authentication_extension<I, S>(&self, lineage: I) -> Option<&dyn AuthenticationExtension>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lineage
            .into_iter()
            .find_map(|class| self.authenticators.get(class.as_ref()))
            .map(|e| e.as_ref())
    }
}
