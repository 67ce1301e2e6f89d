//! Error types for the datadoc core.
//!
//! Path parsing never fails (missing facts degrade to `None`), so every
//! variant here belongs to document handling, extraction, migration or the
//! merge gate.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the datadoc core.
#[derive(Debug, Error)]
pub enum DatadocError {
    // Schema migration errors
    #[error("Metadata document has unknown version {version}")]
    UnknownModelVersion { version: String },

    #[error("Invalid version registry: {message}")]
    InvalidRegistry { message: String },

    // Merge gate errors
    #[error("{message}")]
    InconsistentDatasets { message: String },

    // Document errors
    #[error("Malformed metadata document {path:?}: {message}")]
    MalformedDocument { path: PathBuf, message: String },

    #[error("Could not read dataset {path:?}: {message}")]
    DatasetRead { path: PathBuf, message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

/// Result type alias for datadoc operations.
pub type Result<T> = std::result::Result<T, DatadocError>;

impl From<std::io::Error> for DatadocError {
    fn from(err: std::io::Error) -> Self {
        DatadocError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for DatadocError {
    fn from(err: serde_json::Error) -> Self {
        DatadocError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl DatadocError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        DatadocError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether the caller may continue without the existing document.
    ///
    /// A document that cannot be parsed is dropped and the dataset is
    /// documented from extraction alone. Unknown versions are never
    /// recoverable: treating them as current would corrupt metadata.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DatadocError::MalformedDocument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatadocError::UnknownModelVersion {
            version: "99.0.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "Metadata document has unknown version 99.0.0"
        );
    }

    #[test]
    fn test_inconsistent_datasets_displays_message_verbatim() {
        let err = DatadocError::InconsistentDatasets {
            message: "Bucket name".into(),
        };
        assert_eq!(err.to_string(), "Bucket name");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(DatadocError::MalformedDocument {
            path: PathBuf::from("x__DOC.json"),
            message: "expected value".into(),
        }
        .is_recoverable());
        assert!(!DatadocError::UnknownModelVersion {
            version: "99.0.0".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_io_with_path_keeps_path() {
        let err = DatadocError::io_with_path(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "/tmp/a.json",
        );
        match err {
            DatadocError::Io { path, .. } => assert_eq!(path, Some(PathBuf::from("/tmp/a.json"))),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
