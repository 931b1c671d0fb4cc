//! In-memory collection of every descriptor known to a generation run.

use crate::descriptor::RecordDescriptor;
use crate::error::{Error, Result};
use crate::model::ModelDescriptor;
use crate::route::{RouteDescriptor, ViewDescriptor};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;
use std::path::PathBuf;

/// Records, models and views keyed by identity, plus routes in declaration order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: IndexMap<String, RecordDescriptor>,
    models: IndexMap<String, ModelDescriptor>,
    views: IndexMap<String, ViewDescriptor>,
    routes: Vec<RouteDescriptor>,
}

fn duplicate(kind: &str, key: &str) -> Error {
    Error::ManifestError {
        file: PathBuf::new(),
        message: format!("duplicate {} \"{}\"", kind, key),
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: RecordDescriptor) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &record.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(duplicate(
                    &format!("field in record {}:", record.type_path),
                    &field.name,
                ));
            }
        }
        if self.records.contains_key(&record.type_path) {
            return Err(duplicate("record", &record.type_path));
        }
        debug!("Registered record {}", record.type_path);
        self.records.insert(record.type_path.clone(), record);
        Ok(())
    }

    pub fn add_model(&mut self, model: ModelDescriptor) -> Result<()> {
        if self.models.contains_key(&model.name) {
            return Err(duplicate("model", &model.name));
        }
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    pub fn add_view(&mut self, view: ViewDescriptor) -> Result<()> {
        if self.views.contains_key(&view.name) {
            return Err(duplicate("view", &view.name));
        }
        self.views.insert(view.name.clone(), view);
        Ok(())
    }

    pub fn add_route(&mut self, route: RouteDescriptor) {
        self.routes.push(route);
    }

    /// Look a record up by type path, falling back to its declared name when
    /// that name is unambiguous
    pub fn record(&self, key: &str) -> Option<&RecordDescriptor> {
        if let Some(record) = self.records.get(key) {
            return Some(record);
        }
        let mut by_name = self.records.values().filter(|r| r.name == key);
        match (by_name.next(), by_name.next()) {
            (Some(record), None) => Some(record),
            _ => None,
        }
    }

    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    pub fn view(&self, name: &str) -> Option<&ViewDescriptor> {
        self.views.get(name)
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordDescriptor> {
        self.records.values()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.models.is_empty() && self.views.is_empty() && self.routes.is_empty()
    }

    /// Move everything from `other` into this catalog
    pub fn merge(&mut self, other: Catalog) -> Result<()> {
        for record in other.records.into_values() {
            self.add_record(record)?;
        }
        for model in other.models.into_values() {
            self.add_model(model)?;
        }
        for view in other.views.into_values() {
            self.add_view(view)?;
        }
        self.routes.extend(other.routes);
        Ok(())
    }
}
