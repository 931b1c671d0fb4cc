//! OpenAPI from descriptors - OpenAPI 3.0 documents from REST framework descriptors.
//!
//! The library turns a static description of a REST API (routes, the views that serve
//! them, the serializers describing request and response records, and the models behind
//! them) into an OpenAPI 3.0 document with deduplicated, reference-linked component
//! schemas.
//!
//! # Architecture
//!
//! 1. [`scanner`] and [`parser`] - Collect YAML/JSON manifests and load them into a [`catalog::Catalog`]
//! 2. [`type_resolver`] and [`basic_types`] - Map type hints and basic types to schemas
//! 3. [`field_mapper`] - Maps individual serializer fields, models and validators to schemas
//! 4. [`schema_generator`] - Resolves records into components and owns a run's [`registry`]
//! 5. [`operation`] and [`parameters`] - Build one OpenAPI operation per route
//! 6. [`extensions`] - Field, record and authentication extensions keyed by class lineage
//! 7. [`generator`] - Runs one generation pass and collects [`diagnostics`]
//! 8. [`openapi_builder`] and [`serializer`] - Assemble and render the document
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_descriptors::{
//!     extensions::ExtensionRegistry,
//!     generator::generate,
//!     parser::ManifestParser,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//!     settings::Settings,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./descriptors")).scan().unwrap();
//! let catalog = ManifestParser::load_catalog(&scan_result.manifest_files).unwrap();
//!
//! let extensions = ExtensionRegistry::with_builtins();
//! let output = generate(&catalog, &Settings::default(), &extensions).unwrap();
//! for diagnostic in output.diagnostics.entries() {
//!     eprintln!("{}", diagnostic);
//! }
//!
//! println!("{}", serialize_yaml(&output.document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod basic_types;
pub mod catalog;
pub mod cli;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod extensions;
pub mod field_mapper;
pub mod generator;
pub mod model;
pub mod openapi_builder;
pub mod operation;
pub mod pagination;
pub mod parameters;
pub mod parser;
pub mod registry;
pub mod route;
pub mod scanner;
pub mod schema;
pub mod schema_generator;
pub mod serializer;
pub mod settings;
pub mod type_resolver;
