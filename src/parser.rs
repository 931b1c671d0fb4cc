use crate::catalog::Catalog;
use crate::descriptor::RecordDescriptor;
use crate::model::ModelDescriptor;
use crate::route::{RouteDescriptor, ViewDescriptor};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for descriptor manifests.
///
/// A manifest is a YAML or JSON document with up to four top-level lists:
/// `records`, `models`, `views` and `routes`. Every list is optional, so
/// descriptors can be spread across several files and merged afterwards.
///
/// # Example
///
/// ```no_run
/// use openapi_from_descriptors::parser::ManifestParser;
/// use std::path::Path;
///
/// let catalog = ManifestParser::parse_file(Path::new("api.yaml")).unwrap();
/// println!("Loaded {} routes", catalog.routes().len());
/// ```
pub struct ManifestParser;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Manifest {
    records: Vec<RecordDescriptor>,
    models: Vec<ModelDescriptor>,
    views: Vec<ViewDescriptor>,
    routes: Vec<RouteDescriptor>,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl ManifestParser {
    /// Parses a single manifest into a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The content is not a valid manifest
    /// - A record declares the same field name twice, or an identity repeats
    pub fn parse_file(path: &Path) -> Result<Catalog> {
        debug!("Parsing manifest: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let catalog = Self::parse_str(&content, is_json(path))
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        debug!(
            "Successfully parsed manifest {} ({} routes)",
            path.display(),
            catalog.routes().len()
        );
        Ok(catalog)
    }

    /// Parses manifest content; `json` selects the JSON reader, YAML otherwise.
    pub fn parse_str(content: &str, json: bool) -> Result<Catalog> {
        let manifest: Manifest = if json {
            serde_json::from_str(content)?
        } else if content.trim().is_empty() {
            Manifest::default()
        } else {
            serde_yaml::from_str(content)?
        };

        let mut catalog = Catalog::new();
        for record in manifest.records {
            catalog.add_record(record)?;
        }
        for model in manifest.models {
            catalog.add_model(model)?;
        }
        for view in manifest.views {
            catalog.add_view(view)?;
        }
        for route in manifest.routes {
            catalog.add_route(route);
        }
        Ok(catalog)
    }

    /// Parses multiple manifests, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings. The returned vector holds one
    /// result per input path, in input order.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<Catalog>> {
        debug!("Parsing {} manifests", paths.len());

        let results: Vec<Result<Catalog>> = paths
            .iter()
            .map(|path| match Self::parse_file(path) {
                Ok(catalog) => Ok(catalog),
                Err(e) => {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                    Err(e)
                }
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }

    /// Parses every manifest and merges them, in path order, into one catalog.
    ///
    /// Unlike [`ManifestParser::parse_files`] this fails on the first broken manifest,
    /// since a partial catalog would only surface as unknown views and records later.
    pub fn load_catalog(paths: &[PathBuf]) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        for (path, result) in paths.iter().zip(Self::parse_files(paths)) {
            let parsed = result?;
            catalog
                .merge(parsed)
                .with_context(|| format!("Failed to merge manifest: {}", path.display()))?;
        }
        info!(
            "Loaded {} records and {} routes from {} manifests",
            catalog.records().count(),
            catalog.routes().len(),
            paths.len()
        );
        Ok(catalog)
    }
}
