use std::path::PathBuf;

/// Result type alias for the library core
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types.
///
/// Anything that merely degrades the generated document is reported through
/// [`crate::diagnostics::Diagnostics`] instead and never surfaces here.
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    ManifestError { file: PathBuf, message: String },
    InvalidArgument(String),
    InvalidPattern { pattern: String, message: String },
    SerializationError(String),
    /// A descriptor violates an assumption the generator cannot work around.
    InvariantViolation(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::ManifestError { file, message } => {
                write!(f, "invalid manifest {}: {}", file.display(), message)
            }
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern \"{}\": {}", pattern, message)
            }
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            Error::InvariantViolation(msg) => write!(f, "invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML error: {}", err))
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Error::InvalidArgument(format!("unparsable type hint: {}", err))
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern {
            pattern: String::new(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invariant_violation() {
        let err = Error::InvariantViolation("read-only field without model".to_string());
        assert_eq!(
            err.to_string(),
            "invariant violated: read-only field without model"
        );
    }

    #[test]
    fn test_display_manifest_error() {
        let err = Error::ManifestError {
            file: PathBuf::from("api.yaml"),
            message: "duplicate field".to_string(),
        };
        assert_eq!(err.to_string(), "invalid manifest api.yaml: duplicate field");
    }

    #[test]
    fn test_io_error_has_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
