//! Generation run: every route of a catalog into one OpenAPI document.

use crate::catalog::Catalog;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::extensions::ExtensionRegistry;
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::operation::OperationBuilder;
use crate::schema_generator::SchemaGenerator;
use crate::settings::Settings;
use log::{debug, info};

/// Document plus everything that went wrong while building it
#[derive(Debug)]
pub struct GenerationOutput {
    pub document: OpenApiDocument,
    pub diagnostics: Diagnostics,
}

/// Run one generation pass over the routes of `catalog`, in route order.
///
/// Unknown views and unresolvable operations are skipped and reported as
/// diagnostics. Only invariant violations and invalid settings abort the run.
pub fn generate(catalog: &Catalog, settings: &Settings, extensions: &ExtensionRegistry) -> Result<GenerationOutput> {
    let path_prefix = settings.path_prefix()?;
    let mut generator = SchemaGenerator::new(catalog, settings, extensions);
    let mut builder = OpenApiBuilder::new(settings);

    for route in catalog.routes() {
        generator.diagnostics_mut().set_context(Some(route.label()));

        let Some(view) = catalog.view(&route.view) else {
            generator.diagnostics_mut().error(format!(
                "route references unknown view \"{}\"; skipping operation",
                route.view
            ));
            continue;
        };

        match OperationBuilder::new(&mut generator, route, view, path_prefix.as_ref()).build()? {
            Some(operation) => builder.add_operation(&route.path, route.method, operation),
            None => debug!("Skipped operation {}", route.label()),
        }
    }
    generator.diagnostics_mut().set_context(None);

    let (registry, diagnostics) = generator.finish();
    info!(
        "Generated {} components with {} diagnostics",
        registry.len(),
        diagnostics.len()
    );
    let document = builder.build(registry, &settings.append_components)?;
    Ok(GenerationOutput { document, diagnostics })
}
