//! OpenAPI from descriptors - command-line tool for generating OpenAPI documents.
//!
//! Reads route, view, serializer and model descriptors from YAML or JSON manifests and
//! renders an OpenAPI 3.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-descriptors [OPTIONS] <INPUT>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-descriptors ./descriptors -o openapi.yaml
//! ```
//!
//! Generate JSON with custom settings, failing on any diagnostic:
//! ```bash
//! openapi-from-descriptors api.yaml --settings settings.yaml -f json --fail-on-warn
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_descriptors::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI from descriptors starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
