use anyhow::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognised as descriptor manifests
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// File scanner for collecting descriptor manifests.
///
/// The `FileScanner` recursively walks an input directory to find all manifest files
/// (`.yaml`, `.yml` and `.json`). It skips `target` and hidden directories (those
/// starting with `.`). A root that is itself a manifest file yields just that file.
///
/// # Example
///
/// ```no_run
/// use openapi_from_descriptors::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./descriptors"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} manifests", result.manifest_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// Manifest paths, sorted so merge order does not depend on the file system
    pub manifest_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| MANIFEST_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all manifest files.
    ///
    /// If any directories or files cannot be accessed, warnings are logged and added to
    /// the result, but scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.exists() {
            anyhow::bail!("Input path does not exist: {}", self.root_path.display());
        }

        let mut manifest_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path).into_iter().filter_entry(|e| {
            // Don't filter the root itself
            if e.path() == self.root_path {
                return true;
            }

            let file_name = e.file_name().to_string_lossy();
            let is_hidden = file_name.starts_with('.');
            let is_target = file_name == "target";

            !is_hidden && !is_target
        }) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_manifest(path) {
                        debug!("Found manifest {}", path.display());
                        manifest_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        manifest_files.sort();
        Ok(ScanResult {
            manifest_files,
            warnings,
        })
    }
}
