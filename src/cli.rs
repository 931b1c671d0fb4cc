use crate::diagnostics::Diagnostics;
use crate::extensions::ExtensionRegistry;
use crate::generator::generate;
use crate::parser::ManifestParser;
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// OpenAPI from descriptors - Generate OpenAPI 3.0 documents from route, view and serializer manifests
#[derive(Parser, Debug)]
#[command(name = "openapi-from-descriptors")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Manifest file, or directory scanned for `.yaml`, `.yml` and `.json` manifests
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Settings file (YAML or JSON, SCREAMING_SNAKE_CASE keys)
    #[arg(short = 's', long = "settings", value_name = "FILE")]
    pub settings_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Exit with an error if any warning or error was raised during generation
    #[arg(long = "fail-on-warn")]
    pub fail_on_warn: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.input_path.exists() {
        anyhow::bail!("Input path does not exist: {}", args.input_path.display());
    }
    if let Some(ref settings) = args.settings_path {
        if !settings.is_file() {
            anyhow::bail!("Settings file does not exist: {}", settings.display());
        }
    }

    info!("Input: {}", args.input_path.display());
    info!("Output format: {:?}", args.output_format);
    match args.output_path {
        Some(ref output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Print every diagnostic to stderr, followed by the totals
fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.entries() {
        eprintln!("{}", diagnostic);
    }
    eprintln!(
        "Schema generation summary: {} warnings, {} errors",
        diagnostics.warnings().count(),
        diagnostics.errors().count()
    );
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    // Step 1: Load settings
    let settings = match &args.settings_path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    // Step 2: Collect manifests
    info!("Scanning {}...", args.input_path.display());
    let scan_result = FileScanner::new(args.input_path.clone()).scan()?;
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    info!("Found {} manifests", scan_result.manifest_files.len());
    if scan_result.manifest_files.is_empty() {
        anyhow::bail!("No manifest files found in {}", args.input_path.display());
    }

    // Step 3: Load descriptors
    let catalog = ManifestParser::load_catalog(&scan_result.manifest_files)?;
    if catalog.routes().is_empty() {
        warn!("No routes found in the manifests");
    }

    // Step 4: Generate
    info!("Building OpenAPI document...");
    let extensions = ExtensionRegistry::with_builtins();
    let output = generate(&catalog, &settings, &extensions).context("Schema generation failed")?;

    // Step 5: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&output.document)?,
        OutputFormat::Json => serialize_json(&output.document)?,
    };

    // Step 6: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    // Step 7: Summary
    if !output.diagnostics.is_empty() {
        report(&output.diagnostics);
    }
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Manifests loaded: {}", scan_result.manifest_files.len());
    info!("  - Routes: {}", catalog.routes().len());
    info!("  - Paths: {}", output.document.paths.len());
    info!("  - Components: {}", output.document.components.schemas.len());

    if args.fail_on_warn && !output.diagnostics.is_empty() {
        anyhow::bail!(
            "Generation raised {} diagnostics and --fail-on-warn is set",
            output.diagnostics.len()
        );
    }

    Ok(())
}
