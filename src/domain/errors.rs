//! Domain error types
//!
//! This module defines the error hierarchy for PiiFlag.
//! All errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main PiiFlag error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PiiFlagError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record source errors (unsupported format, undetectable columns, bad rows)
    #[error("Input error: {0}")]
    Input(String),

    /// The loaded batch contained no records
    #[error("Empty input: no records to score")]
    EmptyBatch,

    /// Classifier artifact errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PiiFlagError {
    /// Returns true when the error originates from configuration or model schema problems
    pub fn is_configuration(&self) -> bool {
        match self {
            PiiFlagError::Configuration(_) => true,
            PiiFlagError::Model(e) => !e.is_recoverable(),
            _ => false,
        }
    }
}

/// Classifier artifact errors
///
/// Errors that occur when loading or validating a trained classifier artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact file does not exist
    #[error("Model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Artifact file exists but cannot be read
    #[error("Failed to read model artifact {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// Artifact content is not a valid bundle
    #[error("Invalid model artifact format: {0}")]
    InvalidFormat(String),

    /// Artifact was written by an incompatible version
    #[error("Unsupported model artifact version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Artifact references a feature column this build cannot compute
    #[error("Unknown feature column in model artifact: {0}")]
    UnknownColumn(String),

    /// Feature count the classifier expects differs from what is supplied
    #[error("Feature schema mismatch: expected {expected} features, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    /// Internal dimensions of the artifact are inconsistent
    #[error("Model dimension mismatch: {0}")]
    DimensionMismatch(String),
}

impl ModelError {
    /// Whether auto mode may fall back to regex-only scoring after this error
    ///
    /// Schema and dimension problems are never recoverable: the artifact exists
    /// and loads, but would produce silently wrong scores.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ModelError::NotFound(_)
                | ModelError::Unreadable { .. }
                | ModelError::InvalidFormat(_)
                | ModelError::UnsupportedVersion { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PiiFlagError {
    fn from(err: std::io::Error) -> Self {
        PiiFlagError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PiiFlagError {
    fn from(err: serde_json::Error) -> Self {
        PiiFlagError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PiiFlagError {
    fn from(err: toml::de::Error) -> Self {
        PiiFlagError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors
impl From<csv::Error> for PiiFlagError {
    fn from(err: csv::Error) -> Self {
        PiiFlagError::Input(format!("CSV error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PiiFlagError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
        assert_eq!(
            PiiFlagError::EmptyBatch.to_string(),
            "Empty input: no records to score"
        );
    }

    #[test]
    fn test_model_error_conversion() {
        let model_err = ModelError::NotFound(PathBuf::from("missing.json"));
        let err: PiiFlagError = model_err.into();
        assert!(matches!(err, PiiFlagError::Model(_)));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_schema_mismatch_is_not_recoverable() {
        let err = ModelError::SchemaMismatch {
            expected: 6,
            found: 5,
        };
        assert!(!err.is_recoverable());
        assert!(PiiFlagError::from(err).is_configuration());
        assert!(!ModelError::UnknownColumn("x".into()).is_recoverable());
        assert!(!ModelError::DimensionMismatch("x".into()).is_recoverable());
    }

    #[test]
    fn test_load_errors_are_recoverable() {
        assert!(ModelError::NotFound(PathBuf::from("a")).is_recoverable());
        assert!(ModelError::InvalidFormat("bad".into()).is_recoverable());
        assert!(ModelError::UnsupportedVersion {
            found: 9,
            supported: 1
        }
        .is_recoverable());
        assert!(!PiiFlagError::from(ModelError::InvalidFormat("bad".into())).is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PiiFlagError = io_err.into();
        assert!(matches!(err, PiiFlagError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PiiFlagError = json_err.into();
        assert!(matches!(err, PiiFlagError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PiiFlagError = toml_err.into();
        assert!(matches!(err, PiiFlagError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
