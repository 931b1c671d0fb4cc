//! Generator configuration.
//!
//! Settings are read from a YAML or JSON file whose keys are spelled in
//! `SCREAMING_SNAKE_CASE`. Every key is optional.

use crate::error::{Error, Result};
use anyhow::Context;
use indexmap::IndexMap;
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct Settings {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
    /// Regex removed from paths before they are tokenized into operationId and tags
    pub schema_path_prefix: String,
    /// Emit separate `...Request` components with read/write-only fields stripped
    pub component_split_request: bool,
    /// Emit an all-optional `Patched...` request component for PATCH
    pub component_split_patch: bool,
    pub coerce_decimal_to_string: bool,
    pub uploaded_files_use_url: bool,
    /// Raw components merged into the document verbatim, keyed by section
    /// (`schemas`, `securitySchemes`, ...) and then by component name
    pub append_components: IndexMap<String, IndexMap<String, Value>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            version: "0.0.0".to_string(),
            schema_path_prefix: String::new(),
            component_split_request: false,
            component_split_patch: true,
            coerce_decimal_to_string: true,
            uploaded_files_use_url: true,
            append_components: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a `.yaml`, `.yml` or `.json` file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading settings from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let settings = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {}", path.display()))?
        };
        Ok(settings)
    }

    /// Compile `SCHEMA_PATH_PREFIX`; `None` when no prefix is configured
    pub fn path_prefix(&self) -> Result<Option<Regex>> {
        if self.schema_path_prefix.is_empty() {
            return Ok(None);
        }
        RegexBuilder::new(&self.schema_path_prefix)
            .case_insensitive(true)
            .build()
            .map(Some)
            .map_err(|e| Error::InvalidPattern {
                pattern: self.schema_path_prefix.clone(),
                message: e.to_string(),
            })
    }
}
